use rig_retarget::{
    assemble, Channel, Clip, ClipRegistry, Interpolation, Keyframe, ObjectId, RetargetedClip,
    SkeletonBinding,
};

fn binding() -> SkeletonBinding {
    SkeletonBinding {
        id: ObjectId(0),
        name: "Rig".into(),
    }
}

fn clip(name: &str, start: f32, end: f32) -> RetargetedClip {
    let keys = vec![
        Keyframe {
            time: start,
            value: 0.0,
            interpolation: Interpolation::Linear,
        },
        Keyframe {
            time: end,
            value: 1.0,
            interpolation: Interpolation::Linear,
        },
    ];
    RetargetedClip {
        source_name: format!("{name}_Armature"),
        clip: Clip::new(
            name,
            vec![Channel::new("pose.bones[\"Hips\"].location", 0, keys)],
        ),
    }
}

#[test]
fn segments_follow_registry_order_with_native_start_times() {
    let mut registry = ClipRegistry::new();
    registry.put(clip("Idle_Loop", 1.0, 60.0));
    registry.put(clip("Walk_Loop", 10.0, 42.0));
    registry.put(clip("Wave", 1.0, 25.0));

    let lib = assemble(binding(), registry.all());

    assert_eq!(lib.skeleton().name, "Rig");
    assert_eq!(lib.default_clip(), Some("Idle_Loop"));
    let segments: Vec<_> = lib.segments().collect();
    let names: Vec<_> = segments.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Idle_Loop", "Walk_Loop", "Wave"]);

    assert_eq!(segments[0].start, 1.0);
    assert_eq!(segments[0].length, 59.0);
    assert_eq!(segments[1].start, 10.0);
    assert_eq!(segments[1].length, 32.0);
    // same native start as Idle_Loop; distinguished by name only
    assert_eq!(segments[2].start, 1.0);
    assert!(segments.iter().all(|s| s.name == s.clip));
}

#[test]
fn empty_input_builds_empty_library_without_default() {
    let registry = ClipRegistry::new();
    let lib = assemble(binding(), registry.all());
    assert!(lib.is_empty());
    assert_eq!(lib.default_clip(), None);
}

#[test]
fn duplicate_clip_names_are_not_repeated() {
    let a = clip("Idle_Loop", 1.0, 60.0);
    let b = clip("Idle_Loop", 5.0, 10.0);
    let lib = assemble(binding(), [&a, &b]);
    assert_eq!(lib.len(), 1);
    assert_eq!(lib.entry("Idle_Loop").unwrap().start, 1.0);
}

#[test]
fn library_owns_copies_of_registry_clips() {
    let mut registry = ClipRegistry::new();
    registry.put(clip("Idle_Loop", 1.0, 60.0));
    let lib = assemble(binding(), registry.all());
    registry.clear();
    assert_eq!(lib.clips().count(), 1);
    assert_eq!(lib.entry("Idle_Loop").unwrap().clip.channels.len(), 1);
}
