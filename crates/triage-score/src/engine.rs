//! Composite risk score.

use crate::stage::{AgeStage, BloodPressureStage, Stages, TemperatureStage};
use crate::variant::ScoringVariant;

/// Patients scoring at or above this are high-risk.
pub const HIGH_RISK_THRESHOLD: u32 = 4;

/// Blood-pressure points; an invalid reading scores nothing.
#[must_use]
pub fn blood_pressure_points(stage: BloodPressureStage, variant: &ScoringVariant) -> u32 {
    let base = variant.bp_normal_baseline;
    match stage {
        BloodPressureStage::Normal => base,
        BloodPressureStage::Elevated => base + 1,
        BloodPressureStage::Stage1 => base + 2,
        BloodPressureStage::Stage2 => base + 3,
        BloodPressureStage::Invalid => 0,
    }
}

/// Temperature points; the same under every variant.
#[must_use]
pub const fn temperature_points(stage: TemperatureStage) -> u32 {
    match stage {
        TemperatureStage::Normal | TemperatureStage::Invalid => 0,
        TemperatureStage::Low => 1,
        TemperatureStage::High => 2,
    }
}

#[must_use]
pub fn age_points(stage: AgeStage, variant: &ScoringVariant) -> u32 {
    match stage {
        AgeStage::Over65 => 2,
        AgeStage::From40To65 => 1,
        AgeStage::Under40 => variant.age_under_40_baseline,
        AgeStage::Invalid => 0,
    }
}

/// Total score of one patient under `variant`.
#[must_use]
pub fn score(stages: &Stages, variant: &ScoringVariant) -> u32 {
    blood_pressure_points(stages.blood_pressure, variant)
        + temperature_points(stages.temperature)
        + age_points(stages.age, variant)
}

/// Whether a score crosses [`HIGH_RISK_THRESHOLD`].
#[must_use]
pub const fn is_high_risk(score: u32) -> bool {
    score >= HIGH_RISK_THRESHOLD
}
