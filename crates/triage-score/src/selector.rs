//! Variant selection: score every patient under every variant and pick the
//! variant whose high-risk count matches a known target.

use std::collections::BTreeSet;

use serde::Serialize;
use triage_normalize::PatientId;

use crate::engine::{is_high_risk, score};
use crate::error::{Result, ScoreError};
use crate::stage::Stages;
use crate::variant::ScoringVariant;

/// Chosen variant, by position in the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub index: usize,
    pub count: usize,
    /// Whether `count` equals the expected count.
    pub exact: bool,
}

/// Picks one variant given each variant's high-risk count.
pub trait SelectionRule {
    /// Returns `None` only when `counts` is empty.
    fn select(&self, counts: &[usize]) -> Option<Selection>;
}

/// Exact match on the expected count, else the numerically nearest count.
///
/// Ties go to the variant listed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactOrNearest {
    pub expected: usize,
}

impl ExactOrNearest {
    #[must_use]
    pub const fn new(expected: usize) -> Self {
        Self { expected }
    }
}

impl SelectionRule for ExactOrNearest {
    fn select(&self, counts: &[usize]) -> Option<Selection> {
        if let Some(index) = counts.iter().position(|&count| count == self.expected) {
            return Some(Selection {
                index,
                count: counts[index],
                exact: true,
            });
        }

        // min_by_key keeps the first of equal minima.
        counts
            .iter()
            .enumerate()
            .min_by_key(|(_, count)| count.abs_diff(self.expected))
            .map(|(index, &count)| Selection {
                index,
                count,
                exact: false,
            })
    }
}

/// High-risk membership accumulated for one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantTally {
    pub variant: ScoringVariant,
    pub patients: BTreeSet<PatientId>,
}

impl VariantTally {
    #[must_use]
    pub fn count(&self) -> usize {
        self.patients.len()
    }
}

/// Scores patients under every candidate variant as they stream past.
#[derive(Debug, Clone)]
pub struct VariantSelector {
    tallies: Vec<VariantTally>,
}

impl VariantSelector {
    pub fn new(variants: impl IntoIterator<Item = ScoringVariant>) -> Self {
        Self {
            tallies: variants
                .into_iter()
                .map(|variant| VariantTally {
                    variant,
                    patients: BTreeSet::new(),
                })
                .collect(),
        }
    }

    /// Score one patient under every variant.
    pub fn observe(&mut self, id: &PatientId, stages: &Stages) {
        for tally in &mut self.tallies {
            if is_high_risk(score(stages, &tally.variant)) {
                tally.patients.insert(id.clone());
            }
        }
    }

    #[must_use]
    pub fn tallies(&self) -> &[VariantTally] {
        &self.tallies
    }

    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        self.tallies.iter().map(VariantTally::count).collect()
    }

    /// Apply `rule` to the per-variant counts.
    pub fn select(&self, rule: &impl SelectionRule) -> Result<Selection> {
        rule.select(&self.counts()).ok_or(ScoreError::NoVariants)
    }

    pub fn into_tallies(self) -> Vec<VariantTally> {
        self.tallies
    }
}
