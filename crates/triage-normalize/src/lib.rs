//! Tolerant normalization of patient vital-sign fields.
//!
//! Raw patient records are free-form JSON with inconsistent key names and
//! value shapes. This crate turns them into typed optional numbers and
//! blood-pressure pairs without ever failing: anything unusable becomes
//! `None` and is left to the classifier to flag.

pub mod blood_pressure;
pub mod fields;
pub mod numeric;
pub mod record;

pub use blood_pressure::BloodPressure;
pub use fields::FieldAliases;
pub use numeric::{normalize_number, parse_numeric};
pub use record::{PatientId, PatientRecord, Vitals};
