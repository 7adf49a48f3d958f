//! Cross-page deduplication of patient records.

use std::collections::HashMap;

use serde_json::Value;
use triage_normalize::{PatientId, PatientRecord};

/// Patient records keyed by identifier, in first-seen order.
///
/// A later record with an already-seen identifier replaces the earlier one
/// in place. Records without an identifier are dropped and counted.
#[derive(Debug, Clone, Default)]
pub struct PatientCollection {
    records: Vec<PatientRecord>,
    index: HashMap<PatientId, usize>,
    dropped: usize,
    replaced: usize,
}

impl PatientCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw record. Returns `false` when it had no usable identifier.
    pub fn insert(&mut self, raw: Value) -> bool {
        let Some(record) = PatientRecord::from_raw(raw) else {
            self.dropped += 1;
            return false;
        };

        match self.index.get(record.id()) {
            Some(&position) => {
                self.records[position] = record;
                self.replaced += 1;
            }
            None => {
                self.index.insert(record.id().clone(), self.records.len());
                self.records.push(record);
            }
        }
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &PatientId) -> Option<&PatientRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// Records dropped for lacking an identifier.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Records that replaced an earlier one with the same identifier.
    #[must_use]
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatientRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a PatientCollection {
    type Item = &'a PatientRecord;
    type IntoIter = std::slice::Iter<'a, PatientRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Value> for PatientCollection {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        for raw in iter {
            self.insert(raw);
        }
    }
}
