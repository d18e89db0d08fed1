use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::{DeepEndometriosis, Ovary, Peritoneum, SizeBucket, Tube};
use crate::models::{Diagnosis, DiagnosisWithRefs, DoctorSummary, PatientSummary};

pub fn insert_diagnosis(conn: &Connection, diagnosis: &Diagnosis) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO diagnoses (id, patient_id, doctor_id,
                                peritoneum, peritoneum_size,
                                ovary, ovary_size,
                                tube, tube_size,
                                deep_endometriosis, deep_endometriosis_size,
                                observations, final_classification, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            diagnosis.id.to_string(),
            diagnosis.patient_id.to_string(),
            diagnosis.doctor_id.to_string(),
            diagnosis.peritoneum.as_str(),
            diagnosis.peritoneum_size.map(|s| s.as_str()),
            diagnosis.ovary.as_str(),
            diagnosis.ovary_size.map(|s| s.as_str()),
            diagnosis.tube.as_str(),
            diagnosis.tube_size.map(|s| s.as_str()),
            diagnosis.deep_endometriosis.as_str(),
            diagnosis.deep_endometriosis_size.map(|s| s.as_str()),
            diagnosis.observations,
            diagnosis.final_classification,
            diagnosis.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_diagnosis(conn: &Connection, id: &Uuid) -> Result<Option<Diagnosis>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, doctor_id, peritoneum, peritoneum_size,
                ovary, ovary_size, tube, tube_size,
                deep_endometriosis, deep_endometriosis_size,
                observations, final_classification, created_at
         FROM diagnoses WHERE id = ?1",
    )?;

    match stmt.query_row(params![id.to_string()], diagnosis_row) {
        Ok(raw) => Ok(Some(diagnosis_from_row(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const SELECT_WITH_REFS: &str = "SELECT dg.id, dg.patient_id, dg.doctor_id,
            dg.peritoneum, dg.peritoneum_size,
            dg.ovary, dg.ovary_size, dg.tube, dg.tube_size,
            dg.deep_endometriosis, dg.deep_endometriosis_size,
            dg.observations, dg.final_classification, dg.created_at,
            p.name, p.medical_record,
            d.name, d.email, d.crm, d.specialty
     FROM diagnoses dg
     JOIN patients p ON dg.patient_id = p.id
     JOIN doctors d ON dg.doctor_id = d.id";

/// List diagnoses newest first, optionally scoped to one patient, each
/// carrying patient and doctor projections. `rowid` breaks ties between
/// records written within the same timestamp.
pub fn list_diagnoses_with_refs(
    conn: &Connection,
    patient_id: Option<&Uuid>,
) -> Result<Vec<DiagnosisWithRefs>, DatabaseError> {
    let mut diagnoses = Vec::new();

    match patient_id {
        Some(id) => {
            let sql = format!(
                "{SELECT_WITH_REFS}
                 WHERE dg.patient_id = ?1
                 ORDER BY dg.created_at DESC, dg.rowid DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![id.to_string()], diagnosis_refs_row)?;
            for row in rows {
                diagnoses.push(diagnosis_refs_from_row(row?)?);
            }
        }
        None => {
            let sql = format!("{SELECT_WITH_REFS} ORDER BY dg.created_at DESC, dg.rowid DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], diagnosis_refs_row)?;
            for row in rows {
                diagnoses.push(diagnosis_refs_from_row(row?)?);
            }
        }
    }

    Ok(diagnoses)
}

pub fn get_diagnosis_with_refs(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<DiagnosisWithRefs>, DatabaseError> {
    let sql = format!("{SELECT_WITH_REFS} WHERE dg.id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    match stmt.query_row(params![id.to_string()], diagnosis_refs_row) {
        Ok(raw) => Ok(Some(diagnosis_refs_from_row(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

struct RawDiagnosis {
    id: String,
    patient_id: String,
    doctor_id: String,
    peritoneum: String,
    peritoneum_size: Option<String>,
    ovary: String,
    ovary_size: Option<String>,
    tube: String,
    tube_size: Option<String>,
    deep_endometriosis: String,
    deep_endometriosis_size: Option<String>,
    observations: Option<String>,
    final_classification: String,
    created_at: String,
}

fn diagnosis_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDiagnosis> {
    Ok(RawDiagnosis {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        peritoneum: row.get(3)?,
        peritoneum_size: row.get(4)?,
        ovary: row.get(5)?,
        ovary_size: row.get(6)?,
        tube: row.get(7)?,
        tube_size: row.get(8)?,
        deep_endometriosis: row.get(9)?,
        deep_endometriosis_size: row.get(10)?,
        observations: row.get(11)?,
        final_classification: row.get(12)?,
        created_at: row.get(13)?,
    })
}

fn diagnosis_from_row(raw: RawDiagnosis) -> Result<Diagnosis, DatabaseError> {
    Ok(Diagnosis {
        id: parse_uuid(&raw.id)?,
        patient_id: parse_uuid(&raw.patient_id)?,
        doctor_id: parse_uuid(&raw.doctor_id)?,
        peritoneum: Peritoneum::from_str(&raw.peritoneum)?,
        peritoneum_size: parse_size(raw.peritoneum_size)?,
        ovary: Ovary::from_str(&raw.ovary)?,
        ovary_size: parse_size(raw.ovary_size)?,
        tube: Tube::from_str(&raw.tube)?,
        tube_size: parse_size(raw.tube_size)?,
        deep_endometriosis: DeepEndometriosis::from_str(&raw.deep_endometriosis)?,
        deep_endometriosis_size: parse_size(raw.deep_endometriosis_size)?,
        observations: raw.observations,
        final_classification: raw.final_classification,
        created_at: parse_timestamp(&raw.created_at)?,
    })
}

fn parse_size(value: Option<String>) -> Result<Option<SizeBucket>, DatabaseError> {
    value.map(|s| SizeBucket::from_str(&s)).transpose()
}

struct RawDiagnosisRefs {
    diagnosis: RawDiagnosis,
    patient_name: String,
    patient_medical_record: Option<String>,
    doctor_name: String,
    doctor_email: String,
    doctor_crm: String,
    doctor_specialty: String,
}

fn diagnosis_refs_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDiagnosisRefs> {
    Ok(RawDiagnosisRefs {
        diagnosis: diagnosis_row(row)?,
        patient_name: row.get(14)?,
        patient_medical_record: row.get(15)?,
        doctor_name: row.get(16)?,
        doctor_email: row.get(17)?,
        doctor_crm: row.get(18)?,
        doctor_specialty: row.get(19)?,
    })
}

fn diagnosis_refs_from_row(raw: RawDiagnosisRefs) -> Result<DiagnosisWithRefs, DatabaseError> {
    Ok(DiagnosisWithRefs {
        diagnosis: diagnosis_from_row(raw.diagnosis)?,
        patient: PatientSummary {
            name: raw.patient_name,
            medical_record: raw.patient_medical_record,
        },
        doctor: DoctorSummary {
            name: raw.doctor_name,
            email: raw.doctor_email,
            crm: raw.doctor_crm,
            specialty: raw.doctor_specialty,
        },
    })
}
