//! Printable report endpoint.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::api::endpoints::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::report::generate_diagnosis_report;

/// `GET /api/diagnoses/:id/report` — the diagnosis rendered as a printable
/// PDF. The browser's print dialog (or any viewer) takes it from here.
pub async fn diagnosis_report(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, "diagnosis")?;
    let conn = ctx.db()?;
    let diagnosis = db::get_diagnosis(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("Diagnosis not found".into()))?;
    // FK integrity guarantees both rows; a miss here is a server-side fault
    let patient = db::get_patient(&conn, &diagnosis.patient_id)?
        .ok_or_else(|| ApiError::Internal("patient row missing for diagnosis".into()))?;
    let doctor = db::get_doctor(&conn, &diagnosis.doctor_id)?
        .ok_or_else(|| ApiError::Internal("doctor row missing for diagnosis".into()))?;

    let bytes = generate_diagnosis_report(&diagnosis, &patient, &doctor)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=\"relatorio-classificacao.pdf\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
