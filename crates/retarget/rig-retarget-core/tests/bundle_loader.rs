use rig_retarget::{
    parse_bundle_json, ObjectKind, RetargetConfig, StoredBundle, UnmappedChannelPolicy,
};

#[test]
fn parses_source_rig_fixture() {
    let json = rig_retarget_test_fixtures::bundles::json("source-rig").expect("load source-rig");
    let scene = parse_bundle_json(&json)
        .expect("parse source bundle")
        .into_scene()
        .expect("valid source bundle");

    assert_eq!(scene.objects_of_kind(ObjectKind::Skeleton).count(), 1);
    assert_eq!(scene.clips().len(), 3);

    let idle = scene.clip("Idle_Loop_Armature").expect("idle clip");
    assert_eq!(idle.channels.len(), 3);
    assert_eq!(idle.frame_range(), (1.0, 60.0));
    assert_eq!(idle.channels[2].bone_id(), Some("spine_04"));

    let armature = scene
        .objects_of_kind(ObjectKind::Skeleton)
        .next()
        .and_then(|o| o.as_skeleton())
        .expect("armature");
    assert!(armature.has_bone("thigh_l"));
}

#[test]
fn parses_target_rig_fixture_and_preserves_geometry() {
    let stored: StoredBundle =
        rig_retarget_test_fixtures::bundles::load("target-rig").expect("load target-rig");
    let scene = stored.clone().into_scene().expect("valid target bundle");

    let meshes: Vec<_> = scene
        .objects_of_kind(ObjectKind::Mesh)
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(meshes, vec!["Body_Male", "Body_Female", "Cube"]);
    assert!(!scene.find_by_name("Body_Female").unwrap().visible);
    assert_eq!(scene.objects_of_kind(ObjectKind::Light).count(), 1);
    assert_eq!(scene.objects_of_kind(ObjectKind::Camera).count(), 1);

    let male = scene.find_by_name("Body_Male").unwrap().as_mesh().unwrap();
    assert_eq!(male.geometry["vertices"], 1200);
    assert_eq!(male.skin.as_ref().unwrap().skeleton, "Rig");

    assert_eq!(StoredBundle::from_scene(&scene), stored);
}

#[test]
fn truncated_fixture_fails_to_parse() {
    let json = rig_retarget_test_fixtures::bundles::json("truncated").expect("load truncated");
    assert!(parse_bundle_json(&json).is_err());
}

#[test]
fn config_fixture_validates() {
    let json =
        rig_retarget_test_fixtures::configs::json("mannequin-to-rig").expect("load config");
    let cfg = RetargetConfig::from_json_str(&json).expect("valid config");
    assert_eq!(cfg.bone_map.get("pelvis"), Some("Hips"));
    assert_eq!(cfg.clips.output_name("Walk_Loop_Armature"), Some("Walk_Loop"));
    assert_eq!(cfg.unmapped_channels, UnmappedChannelPolicy::PassThrough);
    let tags: Vec<_> = cfg.variants.iter().map(|v| v.tag.as_str()).collect();
    assert_eq!(tags, vec!["Male", "Female"]);
    assert!(!cfg.variants[0].matches("Body_Female"));
}
