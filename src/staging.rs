use crate::ConfigRecord;
use indexmap::IndexMap;

/// Edits not yet persisted, keyed by record identifier.
///
/// Each entry is the full post-edit record, never a field delta: staging the
/// same identifier twice keeps only the latest snapshot. Insertion order is
/// kept so a save batch lists records in the order they were first edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedChanges {
    entries: IndexMap<String, ConfigRecord>,
}

impl StagedChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, record: ConfigRecord) {
        self.entries.insert(record.identifier.clone(), record);
    }

    pub fn unstage(&mut self, identifier: &str) -> Option<ConfigRecord> {
        self.entries.shift_remove(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn get(&self, identifier: &str) -> Option<&ConfigRecord> {
        self.entries.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The batch sent to the persist service: one snapshot per identifier.
    pub fn snapshots(&self) -> Vec<ConfigRecord> {
        self.entries.values().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
