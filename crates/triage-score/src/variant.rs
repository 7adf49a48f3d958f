//! Scoring variants: named baseline configurations for the scoring engine.

use std::fmt;

use serde::Serialize;

/// A named scoring configuration.
///
/// The two baselines are the points awarded for a normal blood pressure and
/// for an under-40 age. Everything else in the scoring formula is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScoringVariant {
    pub name: String,
    pub bp_normal_baseline: u32,
    pub age_under_40_baseline: u32,
}

impl ScoringVariant {
    pub fn new(
        name: impl Into<String>,
        bp_normal_baseline: u32,
        age_under_40_baseline: u32,
    ) -> Self {
        Self {
            name: name.into(),
            bp_normal_baseline,
            age_under_40_baseline,
        }
    }

    /// A variant named after its baselines, e.g. `bp1-age0`.
    #[must_use]
    pub fn from_baselines(bp_normal_baseline: u32, age_under_40_baseline: u32) -> Self {
        Self::new(
            format!("bp{bp_normal_baseline}-age{age_under_40_baseline}"),
            bp_normal_baseline,
            age_under_40_baseline,
        )
    }

    /// The four standard variants: every combination of the two 0/1 toggles.
    ///
    /// Order matters for tie-breaking during selection: the blood-pressure
    /// baseline varies slowest.
    #[must_use]
    pub fn standard_set() -> Vec<Self> {
        let mut variants = Vec::with_capacity(4);
        for bp in [0, 1] {
            for age in [0, 1] {
                variants.push(Self::from_baselines(bp, age));
            }
        }
        variants
    }
}

impl fmt::Display for ScoringVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
