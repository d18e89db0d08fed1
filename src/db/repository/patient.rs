use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_date, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{DoctorSummary, Patient, PatientWithDoctor};

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, email, phone, date_of_birth, medical_record,
                               doctor_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.email,
            patient.phone,
            patient.date_of_birth.map(|d| d.to_string()),
            patient.medical_record,
            patient.doctor_id.to_string(),
            patient.created_at.to_rfc3339(),
            patient.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, phone, date_of_birth, medical_record,
                doctor_id, created_at, updated_at
         FROM patients WHERE id = ?1",
    )?;

    match stmt.query_row(params![id.to_string()], patient_row) {
        Ok(raw) => Ok(Some(patient_from_row(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List patients with their doctor projection, optionally filtered by a
/// case-insensitive substring match over name and medical-record number.
pub fn list_patients(
    conn: &Connection,
    search: Option<&str>,
) -> Result<Vec<PatientWithDoctor>, DatabaseError> {
    const SELECT: &str = "SELECT p.id, p.name, p.email, p.phone, p.date_of_birth,
                p.medical_record, p.doctor_id, p.created_at, p.updated_at,
                d.name, d.email, d.crm, d.specialty
         FROM patients p
         JOIN doctors d ON p.doctor_id = d.id";

    let mut patients = Vec::new();

    match search {
        Some(term) => {
            let sql = format!(
                "{SELECT}
                 WHERE LOWER(p.name) LIKE '%' || LOWER(?1) || '%'
                    OR LOWER(COALESCE(p.medical_record, '')) LIKE '%' || LOWER(?1) || '%'
                 ORDER BY p.name"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![term], patient_with_doctor_row)?;
            for row in rows {
                patients.push(patient_with_doctor_from_row(row?)?);
            }
        }
        None => {
            let sql = format!("{SELECT} ORDER BY p.name");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], patient_with_doctor_row)?;
            for row in rows {
                patients.push(patient_with_doctor_from_row(row?)?);
            }
        }
    }

    Ok(patients)
}

pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE patients SET name = ?2, email = ?3, phone = ?4, date_of_birth = ?5,
                medical_record = ?6, doctor_id = ?7, updated_at = ?8
         WHERE id = ?1",
        params![
            patient.id.to_string(),
            patient.name,
            patient.email,
            patient.phone,
            patient.date_of_birth.map(|d| d.to_string()),
            patient.medical_record,
            patient.doctor_id.to_string(),
            patient.updated_at.to_rfc3339(),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: patient.id.to_string(),
        });
    }
    Ok(())
}

/// Delete a patient and its diagnoses. The schema cascades via the FK, the
/// explicit diagnosis delete keeps the removed count for logging.
pub fn delete_patient_cascade(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let id_str = id.to_string();

    let deleted_diagnoses =
        conn.execute("DELETE FROM diagnoses WHERE patient_id = ?1", params![id_str])?;
    let deleted = conn.execute("DELETE FROM patients WHERE id = ?1", params![id_str])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id_str,
        });
    }

    tracing::info!(patient_id = %id_str, deleted_diagnoses, "Deleted patient with diagnoses");
    Ok(())
}

/// Whether a patient other than `exclude` already holds this email.
pub fn patient_email_exists(
    conn: &Connection,
    email: &str,
    exclude: Option<&Uuid>,
) -> Result<bool, DatabaseError> {
    let count: i64 = match exclude {
        Some(id) => conn.query_row(
            "SELECT COUNT(*) FROM patients WHERE email = ?1 AND id != ?2",
            params![email, id.to_string()],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM patients WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?,
    };
    Ok(count > 0)
}

/// Whether a patient other than `exclude` already holds this medical record.
pub fn patient_medical_record_exists(
    conn: &Connection,
    medical_record: &str,
    exclude: Option<&Uuid>,
) -> Result<bool, DatabaseError> {
    let count: i64 = match exclude {
        Some(id) => conn.query_row(
            "SELECT COUNT(*) FROM patients WHERE medical_record = ?1 AND id != ?2",
            params![medical_record, id.to_string()],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM patients WHERE medical_record = ?1",
            params![medical_record],
            |row| row.get(0),
        )?,
    };
    Ok(count > 0)
}

pub fn count_diagnoses_for_patient(conn: &Connection, id: &Uuid) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM diagnoses WHERE patient_id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

type PatientRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
);

fn patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn patient_from_row(raw: PatientRow) -> Result<Patient, DatabaseError> {
    let (id, name, email, phone, date_of_birth, medical_record, doctor_id, created_at, updated_at) =
        raw;
    Ok(Patient {
        id: parse_uuid(&id)?,
        name,
        email,
        phone,
        date_of_birth: date_of_birth.as_deref().and_then(parse_date),
        medical_record,
        doctor_id: parse_uuid(&doctor_id)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

struct PatientDoctorRow {
    patient: PatientRow,
    doctor_name: String,
    doctor_email: String,
    doctor_crm: String,
    doctor_specialty: String,
}

fn patient_with_doctor_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientDoctorRow> {
    Ok(PatientDoctorRow {
        patient: patient_row(row)?,
        doctor_name: row.get(9)?,
        doctor_email: row.get(10)?,
        doctor_crm: row.get(11)?,
        doctor_specialty: row.get(12)?,
    })
}

fn patient_with_doctor_from_row(raw: PatientDoctorRow) -> Result<PatientWithDoctor, DatabaseError> {
    Ok(PatientWithDoctor {
        patient: patient_from_row(raw.patient)?,
        doctor: DoctorSummary {
            name: raw.doctor_name,
            email: raw.doctor_email,
            crm: raw.doctor_crm,
            specialty: raw.doctor_specialty,
        },
    })
}
