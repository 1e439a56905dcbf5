//! Clip allow-list and rename table.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ordered mapping of source clip names to canonical output clip names.
///
/// Only clips whose name is a key survive retargeting. Output names must be
/// unique (checked by [`ClipSelectionTable::validate`]), which is what makes
/// segment names unique in the assembled library.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipSelectionTable {
    entries: Vec<(String, String)>,
}

impl ClipSelectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update an entry. An existing source keeps its position.
    pub fn insert(&mut self, source: impl Into<String>, output: impl Into<String>) {
        let source = source.into();
        let output = output.into();
        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| *s == source) {
            entry.1 = output;
        } else {
            self.entries.push((source, output));
        }
    }

    /// Output name for a source clip, `None` when the clip is not selected.
    pub fn output_name(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, o)| o.as_str())
    }

    pub fn is_selected(&self, source: &str) -> bool {
        self.output_name(source).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, o)| (s.as_str(), o.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: HashMap<&str, &str> = HashMap::with_capacity(self.entries.len());
        for (index, (source, output)) in self.entries.iter().enumerate() {
            if source.is_empty() || output.is_empty() {
                return Err(ConfigError::EmptyClipName { index });
            }
            if let Some(first) = seen.insert(output.as_str(), source.as_str()) {
                return Err(ConfigError::DuplicateOutputName {
                    output: output.clone(),
                    first: first.to_string(),
                    second: source.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<S: Into<String>, O: Into<String>> FromIterator<(S, O)> for ClipSelectionTable {
    fn from_iter<I: IntoIterator<Item = (S, O)>>(iter: I) -> Self {
        let mut table = ClipSelectionTable::new();
        for (s, o) in iter {
            table.insert(s, o);
        }
        table
    }
}
