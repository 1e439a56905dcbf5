use std::path::PathBuf;
use std::process::ExitCode;

use rig_retarget_orchestrator::convert::{convert_tree, BatchConvertConfig, JsonBundleConverter};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        eprintln!("usage: batch_convert <input dir> <output dir>");
        return ExitCode::FAILURE;
    };
    if !input.is_dir() {
        eprintln!("input directory {} does not exist", input.display());
        return ExitCode::FAILURE;
    }

    let report = convert_tree(
        &input,
        &output,
        &BatchConvertConfig::default(),
        &mut JsonBundleConverter::new(),
    );
    for entry in &report.entries {
        match &entry.error {
            None => {
                println!(
                    "OK    {} ({} bytes)",
                    entry.output.display(),
                    entry.bytes.unwrap_or(0)
                );
                if let Some(inv) = &entry.inventory {
                    println!("      {} meshes, {} armatures", inv.meshes, inv.armatures);
                    for clip in &inv.clips {
                        println!("      animation '{}' ({} frames)", clip.name, clip.frames);
                    }
                }
            }
            Some(e) => println!("ERROR {}: {}", entry.input.display(), e),
        }
    }
    println!("converted: {}, failed: {}", report.converted, report.failed);

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
