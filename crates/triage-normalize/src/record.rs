//! Patient identifiers and the normalized view of a raw record.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::blood_pressure::BloodPressure;
use crate::fields::{AGE, BLOOD_PRESSURE, PATIENT_ID, TEMPERATURE};
use crate::numeric::normalize_number;

/// Trimmed, non-empty patient identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    /// Build an identifier, returning `None` when nothing is left after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Derive the identifier of a raw record.
    ///
    /// String and numeric identifiers are accepted; other JSON types are not.
    pub fn from_record(record: &Value) -> Option<Self> {
        match PATIENT_ID.lookup(record)? {
            Value::String(text) => Self::new(text),
            Value::Number(number) => Self::new(&number.to_string()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized vital signs of one patient.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vitals {
    pub blood_pressure: BloodPressure,
    pub temperature: Option<f64>,
    pub age: Option<f64>,
}

impl Vitals {
    /// Read and normalize the vital-sign fields of a raw record.
    pub fn from_record(record: &Value) -> Self {
        Self {
            blood_pressure: BLOOD_PRESSURE
                .lookup(record)
                .map(BloodPressure::from_value)
                .unwrap_or_default(),
            temperature: TEMPERATURE.lookup(record).and_then(normalize_number),
            age: AGE.lookup(record).and_then(normalize_number),
        }
    }
}

/// A raw record that carries a usable identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    id: PatientId,
    raw: Value,
}

impl PatientRecord {
    /// Wrap a raw record; records without a derivable identifier are rejected.
    pub fn from_raw(raw: Value) -> Option<Self> {
        let id = PatientId::from_record(&raw)?;
        Some(Self { id, raw })
    }

    #[must_use]
    pub fn id(&self) -> &PatientId {
        &self.id
    }

    /// Normalize this record's vital signs.
    #[must_use]
    pub fn vitals(&self) -> Vitals {
        Vitals::from_record(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_trimmed() {
        assert_eq!(PatientId::new("  DEMO001 ").unwrap().as_str(), "DEMO001");
        assert_eq!(PatientId::new("   "), None);
        assert_eq!(PatientId::new(""), None);
    }

    #[test]
    fn test_id_from_record_aliases() {
        let id = PatientId::from_record(&json!({ "patientId": " P-7 " })).unwrap();
        assert_eq!(id.to_string(), "P-7");

        let id = PatientId::from_record(&json!({ "id": 42 })).unwrap();
        assert_eq!(id.as_str(), "42");

        assert_eq!(PatientId::from_record(&json!({ "patient_id": "" })), None);
        assert_eq!(PatientId::from_record(&json!({ "patient_id": true })), None);
        assert_eq!(PatientId::from_record(&json!({ "name": "x" })), None);
    }

    #[test]
    fn test_vitals_from_record() {
        let vitals = Vitals::from_record(&json!({
            "patient_id": "DEMO001",
            "blood_pressure": "118/76",
            "temperature": "99.6°F",
            "age": 70,
        }));
        assert_eq!(vitals.blood_pressure, BloodPressure::new(118.0, 76.0));
        assert_eq!(vitals.temperature, Some(99.6));
        assert_eq!(vitals.age, Some(70.0));
    }

    #[test]
    fn test_vitals_missing_fields() {
        let vitals = Vitals::from_record(&json!({ "patient_id": "DEMO002" }));
        assert_eq!(vitals, Vitals::default());
    }

    #[test]
    fn test_record_requires_id() {
        assert!(PatientRecord::from_raw(json!({ "age": 30 })).is_none());
        let record = PatientRecord::from_raw(json!({ "id": "A", "age": "30" })).unwrap();
        assert_eq!(record.id().as_str(), "A");
        assert_eq!(record.vitals().age, Some(30.0));
    }
}
