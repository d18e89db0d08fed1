//! Enzian — clinical registry and data-entry service for the
//! Enzian/Keckstein endometriosis classification.
//!
//! Doctors and patients are managed through CRUD endpoints over a SQLite
//! store; each consultation records a four-axis classification whose code
//! and severity feed the per-patient history view and the printable report.

pub mod api;
pub mod classification;
pub mod config;
pub mod db;
pub mod history;
pub mod models;
pub mod report;
