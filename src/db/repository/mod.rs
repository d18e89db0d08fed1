//! Repository layer — entity-scoped database operations.
//!
//! One sub-module per entity; all public functions are re-exported here.

mod diagnosis;
mod doctor;
mod patient;
mod seed;

pub use diagnosis::*;
pub use doctor::*;
pub use patient::*;
pub use seed::*;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::DatabaseError;

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::*;
    use crate::models::*;
    use chrono::Utc;
    use rusqlite::Connection;
    use uuid::Uuid;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn make_doctor(conn: &Connection, name: &str, email: &str, crm: &str) -> Doctor {
        let now = Utc::now();
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            crm: crm.into(),
            specialty: "Ginecologia".into(),
            phone: None,
            created_at: now,
            updated_at: now,
        };
        insert_doctor(conn, &doctor).unwrap();
        doctor
    }

    fn make_patient(
        conn: &Connection,
        doctor_id: Uuid,
        name: &str,
        medical_record: Option<&str>,
    ) -> Patient {
        let now = Utc::now();
        let patient = Patient {
            id: Uuid::new_v4(),
            name: name.into(),
            email: None,
            phone: None,
            date_of_birth: None,
            medical_record: medical_record.map(Into::into),
            doctor_id,
            created_at: now,
            updated_at: now,
        };
        insert_patient(conn, &patient).unwrap();
        patient
    }

    fn make_diagnosis(conn: &Connection, patient_id: Uuid, doctor_id: Uuid, code: &str) -> Diagnosis {
        let (p, o, t, d) = crate::classification::parse_code(code).unwrap();
        let diagnosis = Diagnosis {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            peritoneum: p,
            peritoneum_size: Some(SizeBucket::Under3Cm),
            ovary: o,
            ovary_size: None,
            tube: t,
            tube_size: None,
            deep_endometriosis: d,
            deep_endometriosis_size: None,
            observations: Some("Laparoscopia diagnóstica.".into()),
            final_classification: code.into(),
            created_at: Utc::now(),
        };
        insert_diagnosis(conn, &diagnosis).unwrap();
        diagnosis
    }

    #[test]
    fn doctor_insert_and_retrieve() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. João Silva", "joao@exemplo.com", "123456");

        let fetched = get_doctor(&conn, &doctor.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Dr. João Silva");
        assert_eq!(fetched.crm, "123456");
        assert!(fetched.phone.is_none());
    }

    #[test]
    fn doctor_get_unknown_returns_none() {
        let conn = test_db();
        assert!(get_doctor(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn doctor_email_exists_scoped_to_other_records() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");

        assert!(doctor_email_exists(&conn, "a@exemplo.com", None).unwrap());
        // Excluding the owning record itself finds no conflict
        assert!(!doctor_email_exists(&conn, "a@exemplo.com", Some(&doctor.id)).unwrap());
        assert!(!doctor_email_exists(&conn, "b@exemplo.com", None).unwrap());
    }

    #[test]
    fn doctor_crm_exists_scoped_to_other_records() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");

        assert!(doctor_crm_exists(&conn, "111111", None).unwrap());
        assert!(!doctor_crm_exists(&conn, "111111", Some(&doctor.id)).unwrap());
    }

    #[test]
    fn doctor_duplicate_email_rejected_by_schema() {
        let conn = test_db();
        make_doctor(&conn, "Dr. A", "same@exemplo.com", "111111");

        let now = Utc::now();
        let duplicate = Doctor {
            id: Uuid::new_v4(),
            name: "Dr. B".into(),
            email: "same@exemplo.com".into(),
            crm: "222222".into(),
            specialty: "Ginecologia".into(),
            phone: None,
            created_at: now,
            updated_at: now,
        };
        assert!(insert_doctor(&conn, &duplicate).is_err());

        // Failed insert leaves the table unchanged
        let doctors = list_doctors(&conn, None).unwrap();
        assert_eq!(doctors.len(), 1);
    }

    #[test]
    fn doctor_update_overwrites_fields() {
        let conn = test_db();
        let mut doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");

        doctor.specialty = "Reprodução Humana".into();
        doctor.phone = Some("(11) 98765-4321".into());
        update_doctor(&conn, &doctor).unwrap();

        let fetched = get_doctor(&conn, &doctor.id).unwrap().unwrap();
        assert_eq!(fetched.specialty, "Reprodução Humana");
        assert_eq!(fetched.phone.as_deref(), Some("(11) 98765-4321"));
    }

    #[test]
    fn doctor_update_unknown_is_not_found() {
        let conn = test_db();
        let now = Utc::now();
        let ghost = Doctor {
            id: Uuid::new_v4(),
            name: "Ghost".into(),
            email: "ghost@exemplo.com".into(),
            crm: "000000".into(),
            specialty: "None".into(),
            phone: None,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            update_doctor(&conn, &ghost),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn doctor_search_is_case_insensitive_over_name_email_crm() {
        let conn = test_db();
        make_doctor(&conn, "Dr. João Silva", "joao.silva@exemplo.com", "123456");
        make_doctor(&conn, "Dra. Maria Santos", "maria@exemplo.com", "789012");

        assert_eq!(list_doctors(&conn, Some("SILVA")).unwrap().len(), 1);
        assert_eq!(list_doctors(&conn, Some("exemplo")).unwrap().len(), 2);
        assert_eq!(list_doctors(&conn, Some("7890")).unwrap().len(), 1);
        assert!(list_doctors(&conn, Some("nobody")).unwrap().is_empty());
    }

    #[test]
    fn doctor_dependents_counted() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        let other = make_doctor(&conn, "Dr. B", "b@exemplo.com", "222222");
        let patient = make_patient(&conn, doctor.id, "Maria", Some("MS001"));
        make_diagnosis(&conn, patient.id, doctor.id, "P2O1T1B");

        let (patients, diagnoses) = doctor_dependent_counts(&conn, &doctor.id).unwrap();
        assert_eq!((patients, diagnoses), (1, 1));

        let (patients, diagnoses) = doctor_dependent_counts(&conn, &other.id).unwrap();
        assert_eq!((patients, diagnoses), (0, 0));
    }

    #[test]
    fn doctor_with_patients_cannot_be_deleted_at_schema_level() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        make_patient(&conn, doctor.id, "Maria", None);

        // REFERENCES without ON DELETE blocks the delete while the patient exists
        assert!(delete_doctor(&conn, &doctor.id).is_err());
        assert!(get_doctor(&conn, &doctor.id).unwrap().is_some());
    }

    #[test]
    fn doctor_without_dependents_deleted() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        delete_doctor(&conn, &doctor.id).unwrap();
        assert!(get_doctor(&conn, &doctor.id).unwrap().is_none());
    }

    #[test]
    fn patient_insert_and_retrieve() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        let patient = make_patient(&conn, doctor.id, "Maria Santos", Some("MS001"));

        let fetched = get_patient(&conn, &patient.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Maria Santos");
        assert_eq!(fetched.medical_record.as_deref(), Some("MS001"));
        assert_eq!(fetched.doctor_id, doctor.id);
    }

    #[test]
    fn patient_list_includes_doctor_projection() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. João Silva", "joao@exemplo.com", "123456");
        make_patient(&conn, doctor.id, "Maria Santos", Some("MS001"));

        let patients = list_patients(&conn, None).unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].doctor.name, "Dr. João Silva");
        assert_eq!(patients[0].doctor.crm, "123456");
    }

    #[test]
    fn patient_search_over_name_and_medical_record() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        make_patient(&conn, doctor.id, "Maria Santos", Some("MS001"));
        make_patient(&conn, doctor.id, "Ana Oliveira", Some("AO002"));

        assert_eq!(list_patients(&conn, Some("maria")).unwrap().len(), 1);
        assert_eq!(list_patients(&conn, Some("ao0")).unwrap().len(), 1);
        assert!(list_patients(&conn, Some("zz")).unwrap().is_empty());
    }

    #[test]
    fn patient_requires_existing_doctor() {
        let conn = test_db();
        let now = Utc::now();
        let orphan = Patient {
            id: Uuid::new_v4(),
            name: "Orphan".into(),
            email: None,
            phone: None,
            date_of_birth: None,
            medical_record: None,
            doctor_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        assert!(insert_patient(&conn, &orphan).is_err());
    }

    #[test]
    fn patient_email_unique_but_absence_repeatable() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");

        // Any number of patients without email is fine
        make_patient(&conn, doctor.id, "Sem Email 1", None);
        make_patient(&conn, doctor.id, "Sem Email 2", None);

        let now = Utc::now();
        let mut first = Patient {
            id: Uuid::new_v4(),
            name: "Com Email".into(),
            email: Some("dup@email.com".into()),
            phone: None,
            date_of_birth: None,
            medical_record: None,
            doctor_id: doctor.id,
            created_at: now,
            updated_at: now,
        };
        insert_patient(&conn, &first).unwrap();

        first.id = Uuid::new_v4();
        assert!(insert_patient(&conn, &first).is_err());
        assert!(patient_email_exists(&conn, "dup@email.com", None).unwrap());
    }

    #[test]
    fn patient_medical_record_exists_scoped() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        let patient = make_patient(&conn, doctor.id, "Maria", Some("MS001"));

        assert!(patient_medical_record_exists(&conn, "MS001", None).unwrap());
        assert!(!patient_medical_record_exists(&conn, "MS001", Some(&patient.id)).unwrap());
        assert!(!patient_medical_record_exists(&conn, "XX999", None).unwrap());
    }

    #[test]
    fn diagnosis_insert_and_fetch_newest_first() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        let patient = make_patient(&conn, doctor.id, "Maria", Some("MS001"));

        make_diagnosis(&conn, patient.id, doctor.id, "P1O1T1A");
        make_diagnosis(&conn, patient.id, doctor.id, "P3O3T3C");

        let diagnoses = list_diagnoses_with_refs(&conn, Some(&patient.id)).unwrap();
        assert_eq!(diagnoses.len(), 2);
        // Later insert comes first
        assert_eq!(diagnoses[0].diagnosis.final_classification, "P3O3T3C");
        assert_eq!(diagnoses[1].diagnosis.final_classification, "P1O1T1A");
        assert_eq!(diagnoses[0].patient.name, "Maria");
        assert_eq!(diagnoses[0].doctor.crm, "111111");
    }

    #[test]
    fn diagnosis_list_filter_scopes_to_patient() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        let maria = make_patient(&conn, doctor.id, "Maria", Some("MS001"));
        let ana = make_patient(&conn, doctor.id, "Ana", Some("AO002"));

        make_diagnosis(&conn, maria.id, doctor.id, "P1O1T1A");
        make_diagnosis(&conn, ana.id, doctor.id, "P2O1T1B");

        assert_eq!(list_diagnoses_with_refs(&conn, Some(&maria.id)).unwrap().len(), 1);
        assert_eq!(list_diagnoses_with_refs(&conn, None).unwrap().len(), 2);
    }

    #[test]
    fn diagnosis_requires_existing_patient_and_doctor() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        let patient = make_patient(&conn, doctor.id, "Maria", None);

        let diagnosis = Diagnosis {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(), // Non-existent patient
            doctor_id: doctor.id,
            peritoneum: Peritoneum::P1,
            peritoneum_size: None,
            ovary: Ovary::O1,
            ovary_size: None,
            tube: Tube::T1,
            tube_size: None,
            deep_endometriosis: DeepEndometriosis::A,
            deep_endometriosis_size: None,
            observations: None,
            final_classification: "P1O1T1A".into(),
            created_at: Utc::now(),
        };
        assert!(insert_diagnosis(&conn, &diagnosis).is_err());

        let diagnosis = Diagnosis {
            patient_id: patient.id,
            doctor_id: Uuid::new_v4(), // Non-existent doctor
            id: Uuid::new_v4(),
            ..diagnosis
        };
        assert!(insert_diagnosis(&conn, &diagnosis).is_err());
    }

    #[test]
    fn diagnosis_round_trips_sizes_and_observations() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        let patient = make_patient(&conn, doctor.id, "Maria", None);
        let created = make_diagnosis(&conn, patient.id, doctor.id, "P2O1T1B");

        let fetched = get_diagnosis(&conn, &created.id).unwrap().unwrap();
        assert_eq!(fetched.peritoneum, Peritoneum::P2);
        assert_eq!(fetched.peritoneum_size, Some(SizeBucket::Under3Cm));
        assert_eq!(fetched.ovary_size, None);
        assert_eq!(
            fetched.observations.as_deref(),
            Some("Laparoscopia diagnóstica.")
        );
        assert_eq!(fetched.final_classification, "P2O1T1B");
    }

    #[test]
    fn delete_patient_cascade_removes_diagnoses() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        let patient = make_patient(&conn, doctor.id, "Maria", Some("MS001"));
        make_diagnosis(&conn, patient.id, doctor.id, "P1O1T1A");
        make_diagnosis(&conn, patient.id, doctor.id, "P2O1T1B");

        assert_eq!(count_diagnoses_for_patient(&conn, &patient.id).unwrap(), 2);

        delete_patient_cascade(&conn, &patient.id).unwrap();

        assert!(get_patient(&conn, &patient.id).unwrap().is_none());
        assert_eq!(count_diagnoses_for_patient(&conn, &patient.id).unwrap(), 0);
    }

    #[test]
    fn delete_patient_cascade_preserves_other_patients() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. A", "a@exemplo.com", "111111");
        let maria = make_patient(&conn, doctor.id, "Maria", Some("MS001"));
        let ana = make_patient(&conn, doctor.id, "Ana", Some("AO002"));
        make_diagnosis(&conn, maria.id, doctor.id, "P1O1T1A");
        make_diagnosis(&conn, ana.id, doctor.id, "P2O1T1B");

        delete_patient_cascade(&conn, &maria.id).unwrap();

        assert!(get_patient(&conn, &ana.id).unwrap().is_some());
        assert_eq!(count_diagnoses_for_patient(&conn, &ana.id).unwrap(), 1);
    }

    #[test]
    fn delete_patient_cascade_unknown_is_not_found() {
        let conn = test_db();
        assert!(matches!(
            delete_patient_cascade(&conn, &Uuid::new_v4()),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn seed_populates_fixed_demo_dataset() {
        let conn = test_db();
        let seeded = seed_demo_data(&conn).unwrap();

        assert_eq!(seeded.doctors.len(), 3);
        assert_eq!(seeded.patients.len(), 3);

        let diagnoses = list_diagnoses_with_refs(&conn, None).unwrap();
        assert_eq!(diagnoses.len(), 3);

        let codes: Vec<&str> = diagnoses
            .iter()
            .map(|d| d.diagnosis.final_classification.as_str())
            .collect();
        assert!(codes.contains(&"P2O1T1B"));
        assert!(codes.contains(&"P1O2T2A"));
        assert!(codes.contains(&"P3O3T3C"));
    }

    #[test]
    fn seed_resets_previous_data() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "Dr. Old", "old@exemplo.com", "999999");
        let patient = make_patient(&conn, doctor.id, "Old Patient", None);
        make_diagnosis(&conn, patient.id, doctor.id, "P1O1T1A");

        seed_demo_data(&conn).unwrap();

        // Previous records are gone, only the fixed dataset remains
        assert!(get_doctor(&conn, &doctor.id).unwrap().is_none());
        assert_eq!(list_doctors(&conn, None).unwrap().len(), 3);
        assert_eq!(list_patients(&conn, None).unwrap().len(), 3);

        // Seeding twice keeps the dataset fixed
        seed_demo_data(&conn).unwrap();
        assert_eq!(list_doctors(&conn, None).unwrap().len(), 3);
    }
}
