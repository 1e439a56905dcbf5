//! Source-rig → target-rig bone identifier table.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ordered mapping of source bone identifiers to target bone identifiers.
///
/// Neither total nor bijective. Order matters: the remapper tries pairs in
/// this order and the first pair whose source bone a channel references wins.
/// Serialized as a list of `[source, target]` pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoneNameMap {
    pairs: Vec<(String, String)>,
}

impl BoneNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a pair. An existing source keeps its position.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let source = source.into();
        let target = target.into();
        if let Some(pair) = self.pairs.iter_mut().find(|(s, _)| *s == source) {
            pair.1 = target;
        } else {
            self.pairs.push((source, target));
        }
    }

    /// Target identifier for a source bone.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, (source, target)) in self.pairs.iter().enumerate() {
            if source.is_empty() || target.is_empty() {
                return Err(ConfigError::EmptyBoneId { index });
            }
        }
        Ok(())
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for BoneNameMap {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut map = BoneNameMap::new();
        for (s, t) in iter {
            map.insert(s, t);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut map: BoneNameMap = [("pelvis", "Hips"), ("spine_01", "Spine")]
            .into_iter()
            .collect();
        map.insert("pelvis", "Root");
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![("pelvis", "Root"), ("spine_01", "Spine")]);
        assert_eq!(map.get("spine_01"), Some("Spine"));
        assert_eq!(map.get("neck_01"), None);
    }

    #[test]
    fn deserializes_from_pair_list() {
        let map: BoneNameMap =
            serde_json::from_str(r#"[["pelvis","Hips"],["thigh_l","LeftUpLeg"]]"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("thigh_l"), Some("LeftUpLeg"));
    }

    #[test]
    fn validate_rejects_empty_identifiers() {
        let map: BoneNameMap = [("pelvis", "Hips"), ("", "Spine")].into_iter().collect();
        assert!(matches!(
            map.validate(),
            Err(ConfigError::EmptyBoneId { index: 1 })
        ));
    }
}
