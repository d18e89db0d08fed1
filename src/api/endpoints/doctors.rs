//! Doctor registry endpoints.
//!
//! Uniqueness of email and CRM is checked before every write, scoped to
//! "some other record" on update. Deletion is refused while any patient or
//! diagnosis still references the doctor.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::endpoints::{blank_to_none, double_option, parse_id, required};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, MessageResponse};
use crate::db;
use crate::models::Doctor;

const REQUIRED_FIELDS: &str = "Name, email, CRM and specialty are required";
const NOT_FOUND: &str = "Doctor not found";
const EMAIL_TAKEN: &str = "Email already registered";
const CRM_TAKEN: &str = "CRM already registered";

#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// `GET /api/doctors` — list, optionally filtered by substring search.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let conn = ctx.db()?;
    let doctors = db::list_doctors(&conn, query.search.as_deref())?;
    Ok(Json(doctors))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub crm: Option<String>,
    pub specialty: Option<String>,
    pub phone: Option<String>,
}

/// `POST /api/doctors` — register a doctor.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(body): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    let name = required(&body.name, REQUIRED_FIELDS)?;
    let email = required(&body.email, REQUIRED_FIELDS)?;
    let crm = required(&body.crm, REQUIRED_FIELDS)?;
    let specialty = required(&body.specialty, REQUIRED_FIELDS)?;

    let conn = ctx.db()?;
    if db::doctor_email_exists(&conn, email, None)? {
        return Err(ApiError::Conflict(EMAIL_TAKEN.into()));
    }
    if db::doctor_crm_exists(&conn, crm, None)? {
        return Err(ApiError::Conflict(CRM_TAKEN.into()));
    }

    let now = Utc::now();
    let doctor = Doctor {
        id: Uuid::new_v4(),
        name: name.into(),
        email: email.into(),
        crm: crm.into(),
        specialty: specialty.into(),
        phone: blank_to_none(body.phone),
        created_at: now,
        updated_at: now,
    };
    db::insert_doctor(&conn, &doctor)?;

    tracing::info!(doctor_id = %doctor.id, "Doctor registered");
    Ok((StatusCode::CREATED, Json(doctor)))
}

/// `GET /api/doctors/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    let id = parse_id(&id, "doctor")?;
    let conn = ctx.db()?;
    let doctor = db::get_doctor(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;
    Ok(Json(doctor))
}

/// Partial update: a field overwrites only when present in the body.
/// `phone` additionally distinguishes `null` (clear) from absent (keep).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub crm: Option<String>,
    pub specialty: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

/// `PUT /api/doctors/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(body): Json<UpdateDoctorRequest>,
) -> Result<Json<Doctor>, ApiError> {
    let id = parse_id(&id, "doctor")?;
    let conn = ctx.db()?;
    let mut doctor = db::get_doctor(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;

    if let Some(email) = body.email.as_deref().map(str::trim) {
        if email != doctor.email && db::doctor_email_exists(&conn, email, Some(&id))? {
            return Err(ApiError::Conflict(EMAIL_TAKEN.into()));
        }
    }
    if let Some(crm) = body.crm.as_deref().map(str::trim) {
        if crm != doctor.crm && db::doctor_crm_exists(&conn, crm, Some(&id))? {
            return Err(ApiError::Conflict(CRM_TAKEN.into()));
        }
    }

    if let Some(name) = blank_to_none(body.name) {
        doctor.name = name;
    }
    if let Some(email) = blank_to_none(body.email) {
        doctor.email = email;
    }
    if let Some(crm) = blank_to_none(body.crm) {
        doctor.crm = crm;
    }
    if let Some(specialty) = blank_to_none(body.specialty) {
        doctor.specialty = specialty;
    }
    if let Some(phone) = body.phone {
        doctor.phone = blank_to_none(phone);
    }
    doctor.updated_at = Utc::now();

    db::update_doctor(&conn, &doctor)?;
    Ok(Json(doctor))
}

/// `DELETE /api/doctors/:id` — refused while dependents exist.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "doctor")?;
    let conn = ctx.db()?;
    if db::get_doctor(&conn, &id)?.is_none() {
        return Err(ApiError::NotFound(NOT_FOUND.into()));
    }

    let (patients, diagnoses) = db::doctor_dependent_counts(&conn, &id)?;
    if patients > 0 || diagnoses > 0 {
        return Err(ApiError::Dependency(
            "Cannot delete doctor with associated patients or diagnoses".into(),
        ));
    }

    db::delete_doctor(&conn, &id)?;
    tracing::info!(doctor_id = %id, "Doctor deleted");
    Ok(Json(MessageResponse {
        message: "Doctor deleted successfully",
    }))
}
