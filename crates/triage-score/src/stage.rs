//! Stage classification for blood pressure, temperature and age.
//!
//! Every patient gets exactly one stage per dimension. `Invalid` is used
//! whenever the normalized value is absent or falls outside every defined
//! range.

use std::fmt;

use serde::Serialize;
use triage_normalize::{BloodPressure, Vitals};

/// Blood-pressure stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureStage {
    Normal,
    Elevated,
    Stage1,
    Stage2,
    Invalid,
}

impl BloodPressureStage {
    /// Classify a normalized reading.
    ///
    /// Checks run from most to least severe. A reading that matches none of
    /// the ranges (systolic strictly between 129 and 130 with diastolic
    /// below 80) is `Invalid`; the gap is kept as-is rather than folded
    /// into a neighbouring stage.
    #[must_use]
    pub fn classify(reading: &BloodPressure) -> Self {
        let Some((systolic, diastolic)) = reading.components() else {
            return Self::Invalid;
        };

        if systolic >= 140.0 || diastolic >= 90.0 {
            Self::Stage2
        } else if systolic >= 130.0 || diastolic >= 80.0 {
            Self::Stage1
        } else if (120.0..=129.0).contains(&systolic) && diastolic < 80.0 {
            Self::Elevated
        } else if systolic < 120.0 && diastolic < 80.0 {
            Self::Normal
        } else {
            Self::Invalid
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Elevated => "elevated",
            Self::Stage1 => "stage1",
            Self::Stage2 => "stage2",
            Self::Invalid => "invalid",
        }
    }
}

/// Temperature stage (Fahrenheit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureStage {
    Normal,
    Low,
    High,
    Invalid,
}

impl TemperatureStage {
    /// Classify a normalized temperature.
    ///
    /// Values in the open interval (100.9, 101.0) land on `Normal`.
    #[must_use]
    pub fn classify(temperature: Option<f64>) -> Self {
        match temperature {
            Some(t) if !t.is_finite() => Self::Invalid,
            Some(t) if t >= 101.0 => Self::High,
            Some(t) if (99.6..=100.9).contains(&t) => Self::Low,
            Some(_) => Self::Normal,
            None => Self::Invalid,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Low => "low",
            Self::High => "high",
            Self::Invalid => "invalid",
        }
    }
}

/// Age bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AgeStage {
    #[serde(rename = "u40")]
    Under40,
    #[serde(rename = "40to65")]
    From40To65,
    #[serde(rename = "o65")]
    Over65,
    #[serde(rename = "invalid")]
    Invalid,
}

impl AgeStage {
    /// Classify a normalized age in years; negative ages are invalid.
    #[must_use]
    pub fn classify(age: Option<f64>) -> Self {
        match age {
            Some(a) if !a.is_finite() || a < 0.0 => Self::Invalid,
            Some(a) if a > 65.0 => Self::Over65,
            Some(a) if a >= 40.0 => Self::From40To65,
            Some(_) => Self::Under40,
            None => Self::Invalid,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Under40 => "u40",
            Self::From40To65 => "40to65",
            Self::Over65 => "o65",
            Self::Invalid => "invalid",
        }
    }
}

macro_rules! impl_display_via_label {
    ($($stage:ty),+) => {
        $(
            impl fmt::Display for $stage {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )+
    };
}

impl_display_via_label!(BloodPressureStage, TemperatureStage, AgeStage);

/// The three stage labels of one patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Stages {
    pub blood_pressure: BloodPressureStage,
    pub temperature: TemperatureStage,
    pub age: AgeStage,
}

impl Stages {
    #[must_use]
    pub fn classify(vitals: &Vitals) -> Self {
        Self {
            blood_pressure: BloodPressureStage::classify(&vitals.blood_pressure),
            temperature: TemperatureStage::classify(vitals.temperature),
            age: AgeStage::classify(vitals.age),
        }
    }

    /// Whether any dimension is `Invalid`, i.e. a data-quality issue.
    #[must_use]
    pub fn has_invalid(&self) -> bool {
        self.blood_pressure == BloodPressureStage::Invalid
            || self.temperature == TemperatureStage::Invalid
            || self.age == AgeStage::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(systolic: f64, diastolic: f64) -> BloodPressureStage {
        BloodPressureStage::classify(&BloodPressure::new(systolic, diastolic))
    }

    #[test]
    fn test_blood_pressure_ranges() {
        assert_eq!(bp(118.0, 76.0), BloodPressureStage::Normal);
        assert_eq!(bp(120.0, 79.0), BloodPressureStage::Elevated);
        assert_eq!(bp(129.0, 60.0), BloodPressureStage::Elevated);
        assert_eq!(bp(130.0, 70.0), BloodPressureStage::Stage1);
        assert_eq!(bp(110.0, 80.0), BloodPressureStage::Stage1);
        assert_eq!(bp(140.0, 70.0), BloodPressureStage::Stage2);
        assert_eq!(bp(110.0, 90.0), BloodPressureStage::Stage2);
    }

    #[test]
    fn test_blood_pressure_elevated_range_with_high_diastolic() {
        // Diastolic >= 80 is caught by the Stage1 check first.
        assert_eq!(bp(125.0, 85.0), BloodPressureStage::Stage1);
    }

    #[test]
    fn test_blood_pressure_gap_is_invalid() {
        assert_eq!(bp(129.5, 70.0), BloodPressureStage::Invalid);
    }

    #[test]
    fn test_blood_pressure_missing_component() {
        let reading = BloodPressure {
            systolic: Some(150.0),
            diastolic: None,
        };
        assert_eq!(
            BloodPressureStage::classify(&reading),
            BloodPressureStage::Invalid
        );
        assert_eq!(
            BloodPressureStage::classify(&BloodPressure::ABSENT),
            BloodPressureStage::Invalid
        );
    }

    #[test]
    fn test_temperature_ranges() {
        assert_eq!(TemperatureStage::classify(Some(98.6)), TemperatureStage::Normal);
        assert_eq!(TemperatureStage::classify(Some(99.6)), TemperatureStage::Low);
        assert_eq!(TemperatureStage::classify(Some(100.9)), TemperatureStage::Low);
        assert_eq!(TemperatureStage::classify(Some(100.95)), TemperatureStage::Normal);
        assert_eq!(TemperatureStage::classify(Some(101.0)), TemperatureStage::High);
        assert_eq!(TemperatureStage::classify(None), TemperatureStage::Invalid);
        assert_eq!(
            TemperatureStage::classify(Some(f64::NAN)),
            TemperatureStage::Invalid
        );
    }

    #[test]
    fn test_age_ranges() {
        assert_eq!(AgeStage::classify(Some(0.0)), AgeStage::Under40);
        assert_eq!(AgeStage::classify(Some(39.9)), AgeStage::Under40);
        assert_eq!(AgeStage::classify(Some(40.0)), AgeStage::From40To65);
        assert_eq!(AgeStage::classify(Some(65.0)), AgeStage::From40To65);
        assert_eq!(AgeStage::classify(Some(65.5)), AgeStage::Over65);
        assert_eq!(AgeStage::classify(Some(-1.0)), AgeStage::Invalid);
        assert_eq!(AgeStage::classify(None), AgeStage::Invalid);
    }

    #[test]
    fn test_labels() {
        assert_eq!(BloodPressureStage::Stage2.to_string(), "stage2");
        assert_eq!(TemperatureStage::Low.to_string(), "low");
        assert_eq!(AgeStage::From40To65.to_string(), "40to65");
    }

    #[test]
    fn test_has_invalid() {
        let vitals = Vitals {
            blood_pressure: BloodPressure::new(118.0, 76.0),
            temperature: Some(98.0),
            age: None,
        };
        assert!(Stages::classify(&vitals).has_invalid());

        let vitals = Vitals {
            age: Some(30.0),
            ..vitals
        };
        assert!(!Stages::classify(&vitals).has_invalid());
    }
}
