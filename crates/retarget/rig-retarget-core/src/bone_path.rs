//! Bone references inside channel property paths.
//!
//! Grammar (the interchange format's structural bone identity):
//!   pose.bones["<bone id>"].<property>
//! Examples:
//!   `pose.bones["pelvis"].location` -> bone="pelvis", property="location"
//!   `pose.bones["spine_04"].rotation_quaternion` -> bone="spine_04"
//!   `location` -> no bone (object-level channel)
//!
//! Matching is an exact substring test on the bracketed form, so `pelvis` never
//! matches inside `pose.bones["pelvis_twist"]`.

const BONE_PREFIX: &str = "pose.bones[\"";
const BONE_SUFFIX: &str = "\"]";

/// Format the structural reference for a bone identifier.
pub fn bone_reference(bone: &str) -> String {
    let mut s = String::with_capacity(BONE_PREFIX.len() + bone.len() + BONE_SUFFIX.len());
    s.push_str(BONE_PREFIX);
    s.push_str(bone);
    s.push_str(BONE_SUFFIX);
    s
}

/// Bone identifier of the first bone reference in `path`.
pub fn bone_id(path: &str) -> Option<&str> {
    let start = path.find(BONE_PREFIX)? + BONE_PREFIX.len();
    let len = path[start..].find(BONE_SUFFIX)?;
    Some(&path[start..start + len])
}

/// True when `path` contains the bracketed reference to `bone`.
pub fn references_bone(path: &str, bone: &str) -> bool {
    path.contains(&bone_reference(bone))
}

/// Rewrite every reference to `from` into a reference to `to`.
/// Everything else in the path is kept byte for byte. Returns `None` when the
/// path does not reference `from`.
pub fn rename_bone(path: &str, from: &str, to: &str) -> Option<String> {
    let needle = bone_reference(from);
    if !path.contains(&needle) {
        return None;
    }
    Some(path.replace(&needle, &bone_reference(to)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bone_id() {
        assert_eq!(bone_id("pose.bones[\"pelvis\"].location"), Some("pelvis"));
        assert_eq!(
            bone_id("pose.bones[\"upperarm_l\"].rotation_quaternion"),
            Some("upperarm_l")
        );
        assert_eq!(bone_id("location"), None);
        assert_eq!(bone_id("pose.bones[\"unterminated"), None);
    }

    #[test]
    fn reference_match_is_exact() {
        let path = "pose.bones[\"pelvis_twist\"].location";
        assert!(!references_bone(path, "pelvis"));
        assert!(references_bone(path, "pelvis_twist"));
    }

    #[test]
    fn rename_touches_only_the_bone_reference() {
        let out = rename_bone("pose.bones[\"pelvis\"].location", "pelvis", "Hips");
        assert_eq!(out.as_deref(), Some("pose.bones[\"Hips\"].location"));
        assert_eq!(rename_bone("pose.bones[\"neck\"].scale", "pelvis", "Hips"), None);
    }

    #[test]
    fn rename_rewrites_every_reference_to_the_bone() {
        let path = r#"pose.bones["a"].constraints["x"].subtarget_bone=pose.bones["a"]"#;
        let out = rename_bone(path, "a", "b").unwrap();
        assert_eq!(
            out,
            r#"pose.bones["b"].constraints["x"].subtarget_bone=pose.bones["b"]"#
        );
    }
}
