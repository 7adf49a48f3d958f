//! Blood-pressure parsing.
//!
//! The feed carries blood pressure either as a structured object
//! (`{"systolic": 120, "diastolic": 80}`, in assorted casings) or as a
//! `"120/80"` string, sometimes replaced by an error sentinel.

use serde_json::Value;

use crate::fields::{DIASTOLIC, SYSTOLIC};
use crate::numeric::{normalize_number, parse_numeric};

/// Substrings (matched case-insensitively) marking a reading as unusable.
const SENTINELS: &[&str] = &["N/A", "INVALID", "TEMP_ERROR", "ERROR"];

/// Systolic/diastolic pair; each component is finite or absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BloodPressure {
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
}

impl BloodPressure {
    /// Both components absent.
    pub const ABSENT: Self = Self {
        systolic: None,
        diastolic: None,
    };

    #[must_use]
    pub const fn new(systolic: f64, diastolic: f64) -> Self {
        Self {
            systolic: Some(systolic),
            diastolic: Some(diastolic),
        }
    }

    /// Both components as numbers, if both are present.
    #[must_use]
    pub fn components(&self) -> Option<(f64, f64)> {
        Some((self.systolic?, self.diastolic?))
    }

    /// Normalize a raw JSON blood-pressure field.
    ///
    /// Objects are read through the systolic/diastolic alias lists, strings
    /// go through [`BloodPressure::parse`]; anything else is absent.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self {
                systolic: SYSTOLIC.lookup(value).and_then(normalize_number),
                diastolic: DIASTOLIC.lookup(value).and_then(normalize_number),
            },
            Value::String(text) => Self::parse(text),
            _ => Self::ABSENT,
        }
    }

    /// Parse a `"systolic/diastolic"` string.
    ///
    /// Sentinel readings and strings that do not split into exactly two parts
    /// on `/` are absent in both components. Otherwise each half is
    /// normalized independently, so `"120/"` keeps its systolic value.
    pub fn parse(text: &str) -> Self {
        let upper = text.to_uppercase();
        if SENTINELS.iter().any(|sentinel| upper.contains(sentinel)) {
            return Self::ABSENT;
        }

        let mut parts = text.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(systolic), Some(diastolic), None) => Self {
                systolic: parse_numeric(systolic),
                diastolic: parse_numeric(diastolic),
            },
            _ => Self::ABSENT,
        }
    }
}
