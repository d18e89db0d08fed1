//! Demonstration dataset. Destructive: wipes every record first, then
//! inserts three doctors, three patients and three diagnoses with fixed
//! values, so a fresh install has something to show.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use super::{insert_diagnosis, insert_doctor, insert_patient};
use crate::classification::final_classification;
use crate::db::DatabaseError;
use crate::models::enums::{DeepEndometriosis, Ovary, Peritoneum, SizeBucket, Tube};
use crate::models::{Diagnosis, Doctor, Patient};

pub struct SeedData {
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
}

pub fn seed_demo_data(conn: &Connection) -> Result<SeedData, DatabaseError> {
    // Clear in dependency order; diagnoses first so no FK blocks the rest
    conn.execute("DELETE FROM diagnoses", [])?;
    conn.execute("DELETE FROM patients", [])?;
    conn.execute("DELETE FROM doctors", [])?;

    let now = Utc::now();

    let make_doctor = |name: &str, email: &str, crm: &str, specialty: &str, phone: &str| Doctor {
        id: Uuid::new_v4(),
        name: name.into(),
        email: email.into(),
        crm: crm.into(),
        specialty: specialty.into(),
        phone: Some(phone.into()),
        created_at: now,
        updated_at: now,
    };

    let doctors = vec![
        make_doctor(
            "Dr. João Silva",
            "joao.silva@exemplo.com",
            "123456",
            "Ginecologia e Obstetrícia",
            "(11) 98765-4321",
        ),
        make_doctor(
            "Dra. Maria Santos",
            "maria.santos@exemplo.com",
            "789012",
            "Reprodução Humana",
            "(11) 91234-5678",
        ),
        make_doctor(
            "Dr. Pedro Oliveira",
            "pedro.oliveira@exemplo.com",
            "345678",
            "Endocrinologia Ginecológica",
            "(11) 92345-6789",
        ),
    ];
    for doctor in &doctors {
        insert_doctor(conn, doctor)?;
    }

    let make_patient = |name: &str,
                        email: &str,
                        phone: &str,
                        born: (i32, u32, u32),
                        medical_record: &str,
                        doctor_id: Uuid| Patient {
        id: Uuid::new_v4(),
        name: name.into(),
        email: Some(email.into()),
        phone: Some(phone.into()),
        date_of_birth: NaiveDate::from_ymd_opt(born.0, born.1, born.2),
        medical_record: Some(medical_record.into()),
        doctor_id,
        created_at: now,
        updated_at: now,
    };

    let patients = vec![
        make_patient(
            "Maria Santos",
            "maria.santos@email.com",
            "(11) 91234-5678",
            (1990, 5, 15),
            "MS001",
            doctors[0].id,
        ),
        make_patient(
            "Ana Oliveira",
            "ana.oliveira@email.com",
            "(11) 92345-6789",
            (1985, 8, 22),
            "AO002",
            doctors[1].id,
        ),
        make_patient(
            "Carla Pereira",
            "carla.pereira@email.com",
            "(11) 93456-7890",
            (1992, 12, 10),
            "CP003",
            doctors[0].id,
        ),
    ];
    for patient in &patients {
        insert_patient(conn, patient)?;
    }

    let make_diagnosis = |patient_id: Uuid,
                          doctor_id: Uuid,
                          axes: (Peritoneum, Ovary, Tube, DeepEndometriosis),
                          sizes: (SizeBucket, SizeBucket, SizeBucket, SizeBucket),
                          observations: &str| {
        let (peritoneum, ovary, tube, deep) = axes;
        Diagnosis {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            peritoneum,
            peritoneum_size: Some(sizes.0),
            ovary,
            ovary_size: Some(sizes.1),
            tube,
            tube_size: Some(sizes.2),
            deep_endometriosis: deep,
            deep_endometriosis_size: Some(sizes.3),
            observations: Some(observations.into()),
            final_classification: final_classification(peritoneum, ovary, tube, deep),
            created_at: now,
        }
    };

    let diagnoses = [
        make_diagnosis(
            patients[0].id,
            doctors[0].id,
            (Peritoneum::P2, Ovary::O1, Tube::T1, DeepEndometriosis::B),
            (
                SizeBucket::From3To7Cm,
                SizeBucket::Under3Cm,
                SizeBucket::Under3Cm,
                SizeBucket::From3To7Cm,
            ),
            "Paciente apresenta dor pélvica crônica. Lesões observadas durante laparoscopia.",
        ),
        make_diagnosis(
            patients[1].id,
            doctors[1].id,
            (Peritoneum::P1, Ovary::O2, Tube::T2, DeepEndometriosis::A),
            (
                SizeBucket::Under3Cm,
                SizeBucket::From3To7Cm,
                SizeBucket::From3To7Cm,
                SizeBucket::Under3Cm,
            ),
            "Endometriose moderada com envolvimento ovariano bilateral.",
        ),
        make_diagnosis(
            patients[2].id,
            doctors[0].id,
            (Peritoneum::P3, Ovary::O3, Tube::T3, DeepEndometriosis::C),
            (
                SizeBucket::Over7Cm,
                SizeBucket::Over7Cm,
                SizeBucket::Over7Cm,
                SizeBucket::Over7Cm,
            ),
            "Endometriose grave com acometimento extenso e infiltração de órgãos adjacentes.",
        ),
    ];
    for diagnosis in &diagnoses {
        insert_diagnosis(conn, diagnosis)?;
    }

    tracing::info!("Seeded demo dataset: 3 doctors, 3 patients, 3 diagnoses");

    Ok(SeedData { doctors, patients })
}
