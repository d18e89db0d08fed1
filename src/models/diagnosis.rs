use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::doctor::DoctorSummary;
use super::enums::{DeepEndometriosis, Ovary, Peritoneum, SizeBucket, Tube};
use super::patient::PatientSummary;

/// One recorded consultation: the four axis codes with their optional size
/// buckets and the classification string computed from them at creation
/// time. `final_classification` is stored, never recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub peritoneum: Peritoneum,
    pub peritoneum_size: Option<SizeBucket>,
    pub ovary: Ovary,
    pub ovary_size: Option<SizeBucket>,
    pub tube: Tube,
    pub tube_size: Option<SizeBucket>,
    pub deep_endometriosis: DeepEndometriosis,
    pub deep_endometriosis_size: Option<SizeBucket>,
    pub observations: Option<String>,
    pub final_classification: String,
    pub created_at: DateTime<Utc>,
}

/// Diagnosis enriched with patient and doctor projections for display.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisWithRefs {
    #[serde(flatten)]
    pub diagnosis: Diagnosis,
    pub patient: PatientSummary,
    pub doctor: DoctorSummary,
}
