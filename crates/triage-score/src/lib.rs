//! Clinical staging and composite risk scoring.
//!
//! Patients are staged along blood pressure, temperature and age, scored
//! under a small set of [`ScoringVariant`]s, and the variant whose
//! high-risk count matches a known target is selected through a pluggable
//! [`SelectionRule`].

pub mod assessment;
pub mod engine;
pub mod error;
pub mod selector;
pub mod stage;
pub mod variant;

pub use assessment::{Assessment, Assessor, FEVER_THRESHOLD, ResultSet, assess, has_fever};
pub use engine::{HIGH_RISK_THRESHOLD, is_high_risk, score};
pub use error::{Result, ScoreError};
pub use selector::{ExactOrNearest, Selection, SelectionRule, VariantSelector, VariantTally};
pub use stage::{AgeStage, BloodPressureStage, Stages, TemperatureStage};
pub use variant::ScoringVariant;
