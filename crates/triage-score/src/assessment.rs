//! Single-pass assessment of the patient set.
//!
//! Each record is normalized and classified once, then immediately folded
//! into the fever and data-quality sets and into every variant's high-risk
//! tally. Nothing per-record is retained afterwards.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, trace, warn};
use triage_normalize::{PatientId, PatientRecord, Vitals};

use crate::error::Result;
use crate::selector::{Selection, SelectionRule, VariantSelector, VariantTally};
use crate::stage::Stages;
use crate::variant::ScoringVariant;

/// Temperatures at or above this (°F) count as fever.
pub const FEVER_THRESHOLD: f64 = 99.6;

/// Identifier sets submitted back to the API.
///
/// `BTreeSet` keeps each set deduplicated and in ascending string order, and
/// serializes as a sorted JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub high_risk_patients: BTreeSet<PatientId>,
    pub fever_patients: BTreeSet<PatientId>,
    pub data_quality_issues: BTreeSet<PatientId>,
}

/// Whether a normalized temperature is a fever.
#[must_use]
pub fn has_fever(vitals: &Vitals) -> bool {
    vitals.temperature.is_some_and(|t| t >= FEVER_THRESHOLD)
}

/// Outcome of assessing the whole patient set.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub results: ResultSet,
    pub tallies: Vec<VariantTally>,
    pub selection: Selection,
}

impl Assessment {
    /// The variant the selection rule picked.
    #[must_use]
    pub fn selected_variant(&self) -> &ScoringVariant {
        &self.tallies[self.selection.index].variant
    }
}

/// Accumulates results one record at a time.
#[derive(Debug, Clone)]
pub struct Assessor<R> {
    selector: VariantSelector,
    rule: R,
    fever: BTreeSet<PatientId>,
    data_quality: BTreeSet<PatientId>,
    observed: usize,
}

impl<R: SelectionRule> Assessor<R> {
    pub fn new(variants: impl IntoIterator<Item = ScoringVariant>, rule: R) -> Self {
        Self {
            selector: VariantSelector::new(variants),
            rule,
            fever: BTreeSet::new(),
            data_quality: BTreeSet::new(),
            observed: 0,
        }
    }

    /// Classify one record and fold it into every set.
    pub fn observe(&mut self, record: &PatientRecord) {
        let vitals = record.vitals();
        let stages = Stages::classify(&vitals);
        trace!(
            blood_pressure = %stages.blood_pressure,
            temperature = %stages.temperature,
            age = %stages.age,
            "classified patient"
        );

        if has_fever(&vitals) {
            self.fever.insert(record.id().clone());
        }
        if stages.has_invalid() {
            self.data_quality.insert(record.id().clone());
        }
        self.selector.observe(record.id(), &stages);
        self.observed += 1;
    }

    /// Select a variant and produce the final result sets.
    pub fn finish(self) -> Result<Assessment> {
        let selection = self.selector.select(&self.rule)?;
        let tallies = self.selector.into_tallies();

        for tally in &tallies {
            debug!(variant = %tally.variant, count = tally.count(), "variant tally");
        }
        let selected = &tallies[selection.index];
        if !selection.exact {
            warn!(
                variant = %selected.variant,
                count = selection.count,
                "no scoring variant matched the expected high-risk count exactly"
            );
        }
        let high_risk_patients = selected.patients.clone();
        debug!(patients = self.observed, "assessment complete");

        Ok(Assessment {
            results: ResultSet {
                high_risk_patients,
                fever_patients: self.fever,
                data_quality_issues: self.data_quality,
            },
            tallies,
            selection,
        })
    }
}

/// Assess a batch of records in one pass.
pub fn assess<'a, R: SelectionRule>(
    records: impl IntoIterator<Item = &'a PatientRecord>,
    variants: impl IntoIterator<Item = ScoringVariant>,
    rule: R,
) -> Result<Assessment> {
    let mut assessor = Assessor::new(variants, rule);
    for record in records {
        assessor.observe(record);
    }
    assessor.finish()
}
