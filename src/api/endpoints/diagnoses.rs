//! Diagnosis endpoints.
//!
//! A diagnosis is created once and never updated: the server computes
//! `finalClassification` from the four axis codes at creation time and the
//! stored value stays authoritative from then on. Removal happens only
//! through the patient cascade.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::endpoints::{blank_to_none, parse_enum, parse_id, parse_size, required};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::classification::final_classification;
use crate::db;
use crate::models::enums::{DeepEndometriosis, Ovary, Peritoneum, Tube};
use crate::models::{Diagnosis, DiagnosisWithRefs, DoctorSummary, PatientSummary};

const REQUIRED_FIELDS: &str = "Missing required fields";
const NOT_FOUND: &str = "Diagnosis not found";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisListQuery {
    pub patient_id: Option<String>,
}

/// `GET /api/diagnoses` — newest first, optionally scoped to one patient.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<DiagnosisListQuery>,
) -> Result<Json<Vec<DiagnosisWithRefs>>, ApiError> {
    let patient_id = query
        .patient_id
        .as_deref()
        .map(|s| parse_id(s, "patient"))
        .transpose()?;

    let conn = ctx.db()?;
    let diagnoses = db::list_diagnoses_with_refs(&conn, patient_id.as_ref())?;
    Ok(Json(diagnoses))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiagnosisRequest {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub peritoneum: Option<String>,
    pub peritoneum_size: Option<String>,
    pub ovary: Option<String>,
    pub ovary_size: Option<String>,
    pub tube: Option<String>,
    pub tube_size: Option<String>,
    pub deep_endometriosis: Option<String>,
    pub deep_endometriosis_size: Option<String>,
    pub observations: Option<String>,
}

/// `POST /api/diagnoses` — record a consultation.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(body): Json<CreateDiagnosisRequest>,
) -> Result<(StatusCode, Json<DiagnosisWithRefs>), ApiError> {
    let patient_id = parse_id(required(&body.patient_id, REQUIRED_FIELDS)?, "patient")?;
    let doctor_id = parse_id(required(&body.doctor_id, REQUIRED_FIELDS)?, "doctor")?;
    let peritoneum: Peritoneum = parse_enum(required(&body.peritoneum, REQUIRED_FIELDS)?)?;
    let ovary: Ovary = parse_enum(required(&body.ovary, REQUIRED_FIELDS)?)?;
    let tube: Tube = parse_enum(required(&body.tube, REQUIRED_FIELDS)?)?;
    let deep: DeepEndometriosis =
        parse_enum(required(&body.deep_endometriosis, REQUIRED_FIELDS)?)?;

    let conn = ctx.db()?;
    // Bad foreign references answer 400, not 404
    let patient = db::get_patient(&conn, &patient_id)?
        .ok_or_else(|| ApiError::BadRequest("Patient not found".into()))?;
    let doctor = db::get_doctor(&conn, &doctor_id)?
        .ok_or_else(|| ApiError::BadRequest("Doctor not found".into()))?;

    let diagnosis = Diagnosis {
        id: Uuid::new_v4(),
        patient_id,
        doctor_id,
        peritoneum,
        peritoneum_size: parse_size(body.peritoneum_size.as_deref())?,
        ovary,
        ovary_size: parse_size(body.ovary_size.as_deref())?,
        tube,
        tube_size: parse_size(body.tube_size.as_deref())?,
        deep_endometriosis: deep,
        deep_endometriosis_size: parse_size(body.deep_endometriosis_size.as_deref())?,
        observations: blank_to_none(body.observations),
        final_classification: final_classification(peritoneum, ovary, tube, deep),
        created_at: Utc::now(),
    };
    db::insert_diagnosis(&conn, &diagnosis)?;

    tracing::info!(
        diagnosis_id = %diagnosis.id,
        classification = %diagnosis.final_classification,
        "Diagnosis recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(DiagnosisWithRefs {
            diagnosis,
            patient: PatientSummary::of(&patient),
            doctor: DoctorSummary::of(&doctor),
        }),
    ))
}

/// `GET /api/diagnoses/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<DiagnosisWithRefs>, ApiError> {
    let id = parse_id(&id, "diagnosis")?;
    let conn = ctx.db()?;
    let diagnosis = db::get_diagnosis_with_refs(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;
    Ok(Json(diagnosis))
}
