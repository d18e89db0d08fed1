use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered clinician. Email and CRM (the Brazilian medical-license
/// registration) are unique across the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub crm: String,
    pub specialty: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shallow doctor projection nested in patient and diagnosis responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub name: String,
    pub email: String,
    pub crm: String,
    pub specialty: String,
}

impl DoctorSummary {
    pub fn of(doctor: &Doctor) -> Self {
        Self {
            name: doctor.name.clone(),
            email: doctor.email.clone(),
            crm: doctor.crm.clone(),
            specialty: doctor.specialty.clone(),
        }
    }
}
