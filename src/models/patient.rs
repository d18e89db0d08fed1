use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::diagnosis::DiagnosisWithRefs;
use super::doctor::DoctorSummary;

/// A patient under the care of a responsible doctor. Email and the
/// clinic-assigned medical-record number are unique when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub medical_record: Option<String>,
    pub doctor_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shallow patient projection nested in diagnosis responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub name: String,
    pub medical_record: Option<String>,
}

impl PatientSummary {
    pub fn of(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            medical_record: patient.medical_record.clone(),
        }
    }
}

/// Patient enriched with its doctor projection, the list/create response shape.
#[derive(Debug, Clone, Serialize)]
pub struct PatientWithDoctor {
    #[serde(flatten)]
    pub patient: Patient,
    pub doctor: DoctorSummary,
}

/// Full patient view: doctor projection plus diagnosis history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct PatientDetail {
    #[serde(flatten)]
    pub patient: Patient,
    pub doctor: DoctorSummary,
    pub diagnoses: Vec<DiagnosisWithRefs>,
}
