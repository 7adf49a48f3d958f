//! Ordered alias lists for fields whose key name varies between records.
//!
//! The patient feed is inconsistent about naming: the same logical field can
//! show up as `patient_id`, `patientId` or `id`. Each field is described by a
//! [`FieldAliases`] value that is consulted in a fixed preference order.

use serde_json::Value;

/// Ordered key names under which one logical field may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAliases {
    keys: &'static [&'static str],
}

impl FieldAliases {
    /// Create an alias list. `keys` is in preference order.
    #[must_use]
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }

    /// Return the value of the first alias present on `record`.
    ///
    /// An alias holding JSON `null` counts as not present, so lookup falls
    /// through to the next candidate. Non-object records have no fields.
    pub fn lookup<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let object = record.as_object()?;
        self.keys
            .iter()
            .find_map(|key| object.get(*key).filter(|value| !value.is_null()))
    }
}

pub const PATIENT_ID: FieldAliases = FieldAliases::new(&["patient_id", "patientId", "id"]);

pub const BLOOD_PRESSURE: FieldAliases =
    FieldAliases::new(&["blood_pressure", "bloodPressure", "bp", "BP"]);

pub const TEMPERATURE: FieldAliases =
    FieldAliases::new(&["temperature", "temp", "body_temperature", "bodyTemperature"]);

pub const AGE: FieldAliases = FieldAliases::new(&["age", "patient_age", "patientAge"]);

/// Systolic component inside a structured blood-pressure object.
pub const SYSTOLIC: FieldAliases =
    FieldAliases::new(&["systolic", "Systolic", "SYSTOLIC", "sys", "SYS"]);

/// Diastolic component inside a structured blood-pressure object.
pub const DIASTOLIC: FieldAliases =
    FieldAliases::new(&["diastolic", "Diastolic", "DIASTOLIC", "dia", "DIA"]);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_alias_wins() {
        let record = json!({ "id": "LATE", "patientId": "MID", "patient_id": "FIRST" });
        assert_eq!(PATIENT_ID.lookup(&record), Some(&json!("FIRST")));

        let record = json!({ "id": "LATE", "patientId": "MID" });
        assert_eq!(PATIENT_ID.lookup(&record), Some(&json!("MID")));
    }

    #[test]
    fn test_null_alias_falls_through() {
        let record = json!({ "temperature": null, "temp": "99.1" });
        assert_eq!(TEMPERATURE.lookup(&record), Some(&json!("99.1")));
    }

    #[test]
    fn test_missing_field() {
        let record = json!({ "name": "Jane" });
        assert_eq!(AGE.lookup(&record), None);
    }

    #[test]
    fn test_non_object_record() {
        assert_eq!(AGE.lookup(&json!([1, 2, 3])), None);
        assert_eq!(AGE.lookup(&json!("age")), None);
    }
}
