use std::fs;
use std::path::Path;

use rig_retarget::parse_bundle_json;
use rig_retarget_orchestrator::convert::{
    convert_tree, discover_scene_files, BatchConvertConfig, JsonBundleConverter,
};
use rig_retarget_test_fixtures::bundles;

fn populate(root: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(root.join("chars/rigs"))?;
    fs::write(root.join("chars/hero.json"), bundles::json("target-rig")?)?;
    fs::write(root.join("chars/rigs/Mannequin.JSON"), bundles::json("source-rig")?)?;
    fs::write(root.join("chars/hero_COLLISION.json"), bundles::json("target-rig")?)?;
    fs::create_dir_all(root.join("Collision"))?;
    fs::write(root.join("Collision/hero.json"), bundles::json("target-rig")?)?;
    fs::write(root.join("broken.json"), bundles::json("truncated")?)?;
    fs::write(root.join("notes.txt"), "not a scene")?;
    Ok(())
}

#[test]
fn discovery_is_sorted_and_filtered() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    populate(input.path())?;

    let found = discover_scene_files(input.path(), &BatchConvertConfig::default());
    let rel: Vec<_> = found
        .iter()
        .map(|p| p.strip_prefix(input.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        rel,
        vec![
            Path::new("broken.json").to_path_buf(),
            Path::new("chars/hero.json").to_path_buf(),
            Path::new("chars/rigs/Mannequin.JSON").to_path_buf(),
        ]
    );
    Ok(())
}

#[test]
fn converts_tree_and_reports_failures() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;
    populate(input.path())?;

    let report = convert_tree(
        input.path(),
        output.path(),
        &BatchConvertConfig::default(),
        &mut JsonBundleConverter::new(),
    );
    assert_eq!(report.converted, 2);
    assert_eq!(report.failed, 1);
    assert!(!report.is_success());

    let broken = &report.entries[0];
    assert!(broken.input.ends_with("broken.json"));
    assert!(broken.error.is_some());
    assert!(broken.bytes.is_none());

    let hero = output.path().join("chars/hero.json");
    let text = fs::read_to_string(&hero)?;
    assert_eq!(report.entries[1].bytes, Some(text.len() as u64));
    let bundle = parse_bundle_json(&text)?;
    assert_eq!(bundle.objects.len(), 6);

    assert!(output.path().join("chars/rigs/Mannequin.json").is_file());
    assert!(!output.path().join("chars/hero_COLLISION.json").exists());
    assert!(!output.path().join("Collision").exists());
    Ok(())
}

#[test]
fn files_inside_a_collision_directory_are_skipped() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    fs::create_dir_all(input.path().join("Collision"))?;
    fs::write(input.path().join("Collision/hero.json"), bundles::json("target-rig")?)?;
    fs::write(input.path().join("hero.json"), bundles::json("target-rig")?)?;

    let found = discover_scene_files(input.path(), &BatchConvertConfig::default());
    assert_eq!(found, vec![input.path().join("hero.json")]);
    Ok(())
}

#[test]
fn entries_list_meshes_armatures_and_clip_frames() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;
    populate(input.path())?;

    let report = convert_tree(
        input.path(),
        output.path(),
        &BatchConvertConfig::default(),
        &mut JsonBundleConverter::new(),
    );

    let hero = report.entries[1].inventory.as_ref().expect("hero inventory");
    assert_eq!((hero.meshes, hero.armatures), (3, 1));
    assert_eq!(hero.clips.len(), 1);
    assert_eq!(hero.clips[0].name, "Rig_Bind");
    assert_eq!(hero.clips[0].frames, 0);

    let rig = report.entries[2].inventory.as_ref().expect("mannequin inventory");
    assert_eq!((rig.meshes, rig.armatures), (1, 1));
    let clips: Vec<_> = rig
        .clips
        .iter()
        .map(|c| (c.name.as_str(), c.frames))
        .collect();
    assert_eq!(clips[0], ("Idle_Loop_Armature", 59));
    assert_eq!(clips[2], ("Walk_Loop_Armature", 32));

    assert!(report.entries[0].inventory.is_none());
    Ok(())
}

#[test]
fn unreadable_input_root_fails_the_batch() -> anyhow::Result<()> {
    let scratch = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;
    let report = convert_tree(
        &scratch.path().join("missing"),
        output.path(),
        &BatchConvertConfig::default(),
        &mut JsonBundleConverter::new(),
    );
    assert_eq!(report.converted, 0);
    assert_eq!(report.failed, 1);
    assert!(!report.is_success());
    assert!(report.entries[0].error.is_some());
    Ok(())
}

#[test]
fn empty_tree_converts_nothing() -> anyhow::Result<()> {
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;
    let report = convert_tree(
        input.path(),
        output.path(),
        &BatchConvertConfig::default(),
        &mut JsonBundleConverter::new(),
    );
    assert_eq!(report.converted, 0);
    assert!(report.is_success());
    Ok(())
}
