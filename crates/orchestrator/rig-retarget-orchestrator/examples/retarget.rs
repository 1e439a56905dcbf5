use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use rig_retarget::RetargetConfig;
use rig_retarget_orchestrator::{JsonBundleIo, Orchestrator};

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let [config, source, target, rest @ ..] = args.as_slice() else {
        bail!("usage: retarget <config.json> <source bundle> <target bundle> [output dir]");
    };

    let config = RetargetConfig::from_path(config)
        .with_context(|| format!("loading {}", config.display()))?;
    let mut orch = Orchestrator::new(config, JsonBundleIo::new())?;
    if let Some(out) = rest.first() {
        orch = orch.with_output_root(out);
    }

    let summary = orch.run(source, target)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if summary.failed() > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
