//! API endpoint handlers, one module per resource.

pub mod diagnoses;
pub mod doctors;
pub mod health;
pub mod patients;
pub mod reports;
pub mod seed;

use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::db::DatabaseError;
use crate::models::enums::SizeBucket;

/// A required request field: present and non-blank, or the given 400 message.
pub(crate) fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(message.into())),
    }
}

/// Optional request fields treat blank strings as absent.
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn parse_id(value: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value.trim())
        .map_err(|e| ApiError::BadRequest(format!("Invalid {entity} ID: {e}")))
}

pub(crate) fn parse_enum<T>(value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DatabaseError>,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

pub(crate) fn parse_size(value: Option<&str>) -> Result<Option<SizeBucket>, ApiError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_enum::<SizeBucket>)
        .transpose()
}

/// Accepts `YYYY-MM-DD`, tolerating a trailing time part.
pub(crate) fn parse_birth_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::BadRequest("Invalid dateOfBirth".into()))
}

/// Distinguishes an absent field from an explicit `null`: absent leaves the
/// stored value alone, `null` clears it.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
