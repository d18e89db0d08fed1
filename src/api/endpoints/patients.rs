//! Patient registry endpoints.
//!
//! Every patient belongs to a responsible doctor; a bad `doctorId` reference
//! answers 400 while a missing patient itself answers 404. Deleting a
//! patient cascades its diagnoses. The history view derives severity and
//! trend from the stored classification codes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::endpoints::{
    blank_to_none, double_option, parse_birth_date, parse_id, required,
};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, MessageResponse};
use crate::db;
use crate::history::{assemble_history, PatientHistory};
use crate::models::{DoctorSummary, Patient, PatientDetail, PatientWithDoctor};

const REQUIRED_FIELDS: &str = "Name and doctorId are required";
const NOT_FOUND: &str = "Patient not found";
const DOCTOR_NOT_FOUND: &str = "Doctor not found";
const EMAIL_TAKEN: &str = "Email already registered";
const RECORD_TAKEN: &str = "Medical record already registered";

#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// `GET /api/patients` — list with doctor projections, optional search over
/// name and medical-record number.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PatientWithDoctor>>, ApiError> {
    let conn = ctx.db()?;
    let patients = db::list_patients(&conn, query.search.as_deref())?;
    Ok(Json(patients))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub medical_record: Option<String>,
    pub doctor_id: Option<String>,
}

/// `POST /api/patients` — register a patient under a doctor.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(body): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientWithDoctor>), ApiError> {
    let name = required(&body.name, REQUIRED_FIELDS)?;
    let doctor_id = parse_id(required(&body.doctor_id, REQUIRED_FIELDS)?, "doctor")?;

    let conn = ctx.db()?;
    // Bad foreign reference, not a missing primary resource: 400
    let doctor = db::get_doctor(&conn, &doctor_id)?
        .ok_or_else(|| ApiError::BadRequest(DOCTOR_NOT_FOUND.into()))?;

    let email = blank_to_none(body.email);
    if let Some(ref email) = email {
        // Uniqueness is checked unconditionally on create
        if db::patient_email_exists(&conn, email, None)? {
            return Err(ApiError::Conflict(EMAIL_TAKEN.into()));
        }
    }
    let medical_record = blank_to_none(body.medical_record);
    if let Some(ref medical_record) = medical_record {
        if db::patient_medical_record_exists(&conn, medical_record, None)? {
            return Err(ApiError::Conflict(RECORD_TAKEN.into()));
        }
    }

    let now = Utc::now();
    let patient = Patient {
        id: Uuid::new_v4(),
        name: name.into(),
        email,
        phone: blank_to_none(body.phone),
        date_of_birth: parse_birth_date(body.date_of_birth.as_deref())?,
        medical_record,
        doctor_id,
        created_at: now,
        updated_at: now,
    };
    db::insert_patient(&conn, &patient)?;

    tracing::info!(patient_id = %patient.id, "Patient registered");
    Ok((
        StatusCode::CREATED,
        Json(PatientWithDoctor {
            patient,
            doctor: DoctorSummary::of(&doctor),
        }),
    ))
}

/// `GET /api/patients/:id` — patient with doctor projection and diagnosis
/// history, newest first.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<PatientDetail>, ApiError> {
    let id = parse_id(&id, "patient")?;
    let conn = ctx.db()?;
    let patient = db::get_patient(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;
    let doctor = db::get_doctor(&conn, &patient.doctor_id)?
        .ok_or_else(|| ApiError::Internal("doctor row missing for patient".into()))?;
    let diagnoses = db::list_diagnoses_with_refs(&conn, Some(&id))?;

    Ok(Json(PatientDetail {
        patient,
        doctor: DoctorSummary::of(&doctor),
        diagnoses,
    }))
}

/// Update payload. Name and doctorId are always required on the observed
/// surface; the remaining fields are patches where presence decides the
/// overwrite and `null` clears the stored value.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date_of_birth: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub medical_record: Option<Option<String>>,
    pub doctor_id: Option<String>,
}

/// `PUT /api/patients/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePatientRequest>,
) -> Result<Json<PatientDetail>, ApiError> {
    let id = parse_id(&id, "patient")?;
    let name = required(&body.name, REQUIRED_FIELDS)?;
    let doctor_id = parse_id(required(&body.doctor_id, REQUIRED_FIELDS)?, "doctor")?;

    let conn = ctx.db()?;
    let mut patient = db::get_patient(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;
    let doctor = db::get_doctor(&conn, &doctor_id)?
        .ok_or_else(|| ApiError::BadRequest(DOCTOR_NOT_FOUND.into()))?;

    if let Some(email_patch) = body.email {
        let email = blank_to_none(email_patch);
        if let Some(ref email) = email {
            if patient.email.as_deref() != Some(email.as_str())
                && db::patient_email_exists(&conn, email, Some(&id))?
            {
                return Err(ApiError::Conflict(EMAIL_TAKEN.into()));
            }
        }
        patient.email = email;
    }
    if let Some(record_patch) = body.medical_record {
        let medical_record = blank_to_none(record_patch);
        if let Some(ref medical_record) = medical_record {
            if patient.medical_record.as_deref() != Some(medical_record.as_str())
                && db::patient_medical_record_exists(&conn, medical_record, Some(&id))?
            {
                return Err(ApiError::Conflict(RECORD_TAKEN.into()));
            }
        }
        patient.medical_record = medical_record;
    }
    if let Some(phone_patch) = body.phone {
        patient.phone = blank_to_none(phone_patch);
    }
    if let Some(birth_patch) = body.date_of_birth {
        patient.date_of_birth = parse_birth_date(birth_patch.as_deref())?;
    }

    patient.name = name.into();
    patient.doctor_id = doctor_id;
    patient.updated_at = Utc::now();
    db::update_patient(&conn, &patient)?;

    let diagnoses = db::list_diagnoses_with_refs(&conn, Some(&id))?;
    Ok(Json(PatientDetail {
        patient,
        doctor: DoctorSummary::of(&doctor),
        diagnoses,
    }))
}

/// `DELETE /api/patients/:id` — removes the patient and all its diagnoses.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "patient")?;
    let conn = ctx.db()?;
    if db::get_patient(&conn, &id)?.is_none() {
        return Err(ApiError::NotFound(NOT_FOUND.into()));
    }

    db::delete_patient_cascade(&conn, &id)?;
    Ok(Json(MessageResponse {
        message: "Patient deleted successfully",
    }))
}

/// `GET /api/patients/:id/history` — diagnoses with severity tiers and
/// trend indicators plus summary figures.
pub async fn history(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<PatientHistory>, ApiError> {
    let id = parse_id(&id, "patient")?;
    let conn = ctx.db()?;
    if db::get_patient(&conn, &id)?.is_none() {
        return Err(ApiError::NotFound(NOT_FOUND.into()));
    }

    let diagnoses = db::list_diagnoses_with_refs(&conn, Some(&id))?;
    Ok(Json(assemble_history(diagnoses)))
}
