use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::Doctor;

pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, name, email, crm, specialty, phone, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            doctor.id.to_string(),
            doctor.name,
            doctor.email,
            doctor.crm,
            doctor.specialty,
            doctor.phone,
            doctor.created_at.to_rfc3339(),
            doctor.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<Option<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, crm, specialty, phone, created_at, updated_at
         FROM doctors WHERE id = ?1",
    )?;

    match stmt.query_row(params![id.to_string()], doctor_row) {
        Ok(raw) => Ok(Some(doctor_from_row(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List doctors, optionally filtered by a case-insensitive substring match
/// over name, email and CRM.
pub fn list_doctors(conn: &Connection, search: Option<&str>) -> Result<Vec<Doctor>, DatabaseError> {
    let mut doctors = Vec::new();

    match search {
        Some(term) => {
            let mut stmt = conn.prepare(
                "SELECT id, name, email, crm, specialty, phone, created_at, updated_at
                 FROM doctors
                 WHERE LOWER(name) LIKE '%' || LOWER(?1) || '%'
                    OR LOWER(email) LIKE '%' || LOWER(?1) || '%'
                    OR LOWER(crm) LIKE '%' || LOWER(?1) || '%'
                 ORDER BY name",
            )?;
            let rows = stmt.query_map(params![term], doctor_row)?;
            for row in rows {
                doctors.push(doctor_from_row(row?)?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, name, email, crm, specialty, phone, created_at, updated_at
                 FROM doctors ORDER BY name",
            )?;
            let rows = stmt.query_map([], doctor_row)?;
            for row in rows {
                doctors.push(doctor_from_row(row?)?);
            }
        }
    }

    Ok(doctors)
}

pub fn update_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE doctors SET name = ?2, email = ?3, crm = ?4, specialty = ?5,
                phone = ?6, updated_at = ?7
         WHERE id = ?1",
        params![
            doctor.id.to_string(),
            doctor.name,
            doctor.email,
            doctor.crm,
            doctor.specialty,
            doctor.phone,
            doctor.updated_at.to_rfc3339(),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: doctor.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_doctor(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM doctors WHERE id = ?1", params![id.to_string()])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Whether a doctor other than `exclude` already holds this email.
pub fn doctor_email_exists(
    conn: &Connection,
    email: &str,
    exclude: Option<&Uuid>,
) -> Result<bool, DatabaseError> {
    let count: i64 = match exclude {
        Some(id) => conn.query_row(
            "SELECT COUNT(*) FROM doctors WHERE email = ?1 AND id != ?2",
            params![email, id.to_string()],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM doctors WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?,
    };
    Ok(count > 0)
}

/// Whether a doctor other than `exclude` already holds this CRM.
pub fn doctor_crm_exists(
    conn: &Connection,
    crm: &str,
    exclude: Option<&Uuid>,
) -> Result<bool, DatabaseError> {
    let count: i64 = match exclude {
        Some(id) => conn.query_row(
            "SELECT COUNT(*) FROM doctors WHERE crm = ?1 AND id != ?2",
            params![crm, id.to_string()],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM doctors WHERE crm = ?1",
            params![crm],
            |row| row.get(0),
        )?,
    };
    Ok(count > 0)
}

/// Counts of patients and diagnoses still referencing the doctor. Deletion
/// is refused while either is non-zero.
pub fn doctor_dependent_counts(
    conn: &Connection,
    id: &Uuid,
) -> Result<(i64, i64), DatabaseError> {
    let id_str = id.to_string();
    let patients: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE doctor_id = ?1",
        params![id_str],
        |row| row.get(0),
    )?;
    let diagnoses: i64 = conn.query_row(
        "SELECT COUNT(*) FROM diagnoses WHERE doctor_id = ?1",
        params![id_str],
        |row| row.get(0),
    )?;
    Ok((patients, diagnoses))
}

type DoctorRow = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
);

fn doctor_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DoctorRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn doctor_from_row(raw: DoctorRow) -> Result<Doctor, DatabaseError> {
    let (id, name, email, crm, specialty, phone, created_at, updated_at) = raw;
    Ok(Doctor {
        id: parse_uuid(&id)?,
        name,
        email,
        crm,
        specialty,
        phone,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
