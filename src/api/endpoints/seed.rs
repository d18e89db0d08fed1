//! Demo-data endpoint. Destructive by design.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{Doctor, Patient};

#[derive(Serialize)]
pub struct SeedResponse {
    pub message: &'static str,
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
}

/// `POST /api/seed` — wipe everything and load the fixed demonstration
/// dataset.
pub async fn run(State(ctx): State<ApiContext>) -> Result<Json<SeedResponse>, ApiError> {
    let conn = ctx.db()?;
    let seeded = db::seed_demo_data(&conn)?;

    Ok(Json(SeedResponse {
        message: "Dados de exemplo criados com sucesso",
        doctors: seeded.doctors,
        patients: seeded.patients,
    }))
}
