//! Printable diagnosis report.
//!
//! Renders a fixed A4 document from a diagnosis + patient + doctor triple.
//! Pure content generation: the caller hands the bytes to a viewer or
//! printer; nothing is persisted and no network is touched.

use std::io::BufWriter;

use printpdf::*;
use thiserror::Error;

use crate::classification::severity_of_code;
use crate::models::enums::SizeBucket;
use crate::models::{Diagnosis, Doctor, Patient};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to prepare PDF font: {0}")]
    Font(String),
    #[error("failed to render PDF: {0}")]
    Render(String),
}

const NOT_INFORMED: &str = "Não informado";

/// Generate the diagnosis report. Returns PDF bytes.
pub fn generate_diagnosis_report(
    diagnosis: &Diagnosis,
    patient: &Patient,
    doctor: &Doctor,
) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new(
        "Relatório de Classificação de Endometriose",
        Mm(210.0),
        Mm(297.0),
        "Layer 1",
    );
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Font(e.to_string()))?;

    let mut y = Mm(280.0);

    // Header
    layer.use_text(
        "Relatório de Classificação de Endometriose",
        14.0,
        Mm(20.0),
        y,
        &bold,
    );
    y -= Mm(6.0);
    layer.use_text(
        "Classificação de Keckstein (Enzian) - Sistema de Diagnóstico Padronizado",
        9.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(4.5);
    layer.use_text(
        format!("Data: {}", diagnosis.created_at.format("%d/%m/%Y")),
        9.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(10.0);

    // Patient block
    layer.use_text("INFORMAÇÕES DO PACIENTE", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    let birth = patient
        .date_of_birth
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "Não informada".into());
    let contact = patient
        .phone
        .as_deref()
        .or(patient.email.as_deref())
        .unwrap_or(NOT_INFORMED);
    for line in [
        format!("Nome: {}", patient.name),
        format!(
            "Prontuário: {}",
            patient.medical_record.as_deref().unwrap_or(NOT_INFORMED)
        ),
        format!("Data de Nascimento: {birth}"),
        format!("Contato: {contact}"),
    ] {
        layer.use_text(&line, 9.0, Mm(25.0), y, &font);
        y -= Mm(4.5);
    }
    y -= Mm(5.5);

    // Doctor block
    layer.use_text("MÉDICO RESPONSÁVEL", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    for line in [
        format!("Nome: {}", doctor.name),
        format!("Especialidade: {}", doctor.specialty),
        format!("CRM: {}", doctor.crm),
        format!("Email: {}", doctor.email),
    ] {
        layer.use_text(&line, 9.0, Mm(25.0), y, &font);
        y -= Mm(4.5);
    }
    y -= Mm(5.5);

    // Headline classification + severity badge
    layer.use_text("CLASSIFICAÇÃO FINAL", 11.0, Mm(20.0), y, &bold);
    y -= Mm(8.0);
    layer.use_text(&diagnosis.final_classification, 22.0, Mm(25.0), y, &bold);
    y -= Mm(7.0);
    let severity = severity_of_code(&diagnosis.final_classification);
    layer.use_text(
        format!("Gravidade: {}", severity.label()),
        10.0,
        Mm(25.0),
        y,
        &bold,
    );
    y -= Mm(10.0);

    // Axis breakdown
    layer.use_text("DETALHES DA CLASSIFICAÇÃO", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    for (code, label, size) in [
        (
            diagnosis.peritoneum.as_str(),
            "Peritônio",
            diagnosis.peritoneum_size,
        ),
        (diagnosis.ovary.as_str(), "Ovário", diagnosis.ovary_size),
        (diagnosis.tube.as_str(), "Tuba", diagnosis.tube_size),
        (
            diagnosis.deep_endometriosis.as_str(),
            "Endometriose Profunda",
            diagnosis.deep_endometriosis_size,
        ),
    ] {
        layer.use_text(
            format!("  {code} — {label}{}", size_suffix(size)),
            9.0,
            Mm(25.0),
            y,
            &font,
        );
        y -= Mm(4.5);
    }

    // Observations, wrapped
    if let Some(observations) = diagnosis
        .observations
        .as_deref()
        .filter(|o| !o.trim().is_empty())
    {
        y -= Mm(5.5);
        layer.use_text("OBSERVAÇÕES", 11.0, Mm(20.0), y, &bold);
        y -= Mm(6.0);
        for line in wrap_text(observations, 90) {
            layer.use_text(&line, 9.0, Mm(25.0), y, &font);
            y -= Mm(4.5);
        }
    }

    // Footer
    y -= Mm(10.0);
    layer.use_text(
        "Este relatório foi gerado pelo Sistema de Classificação de Endometriose - Classificação de Keckstein",
        7.5,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(4.0);
    layer.use_text(
        "Referência: Keckstein J, et al. The #Enzian classification: a comprehensive system for classifying endometriosis. Hum Reprod Open. 2021.",
        7.5,
        Mm(20.0),
        y,
        &font,
    );

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Render(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| ReportError::Render(e.to_string()))
}

fn size_suffix(size: Option<SizeBucket>) -> String {
    match size {
        Some(bucket) => format!(" (Σ {})", bucket.as_str()),
        None => String::new(),
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{DeepEndometriosis, Ovary, Peritoneum, Tube};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn sample() -> (Diagnosis, Patient, Doctor) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: "Dr. João Silva".into(),
            email: "joao.silva@exemplo.com".into(),
            crm: "123456".into(),
            specialty: "Ginecologia e Obstetrícia".into(),
            phone: Some("(11) 98765-4321".into()),
            created_at: now,
            updated_at: now,
        };
        let patient = Patient {
            id: Uuid::new_v4(),
            name: "Maria Santos".into(),
            email: Some("maria.santos@email.com".into()),
            phone: None,
            date_of_birth: None,
            medical_record: Some("MS001".into()),
            doctor_id: doctor.id,
            created_at: now,
            updated_at: now,
        };
        let diagnosis = Diagnosis {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            doctor_id: doctor.id,
            peritoneum: Peritoneum::P2,
            peritoneum_size: Some(SizeBucket::From3To7Cm),
            ovary: Ovary::O1,
            ovary_size: Some(SizeBucket::Under3Cm),
            tube: Tube::T1,
            tube_size: None,
            deep_endometriosis: DeepEndometriosis::B,
            deep_endometriosis_size: None,
            observations: Some(
                "Paciente apresenta dor pélvica crônica. Lesões observadas durante laparoscopia."
                    .into(),
            ),
            final_classification: "P2O1T1B".into(),
            created_at: now,
        };
        (diagnosis, patient, doctor)
    }

    #[test]
    fn report_produces_pdf_bytes() {
        let (diagnosis, patient, doctor) = sample();
        let bytes = generate_diagnosis_report(&diagnosis, &patient, &doctor).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn report_tolerates_missing_optionals() {
        let (mut diagnosis, mut patient, doctor) = sample();
        diagnosis.observations = None;
        patient.medical_record = None;
        patient.email = None;
        let bytes = generate_diagnosis_report(&diagnosis, &patient, &doctor).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wrap_text_splits_long_lines() {
        let text = "uma linha bastante longa que certamente não cabe em dez caracteres";
        let lines = wrap_text(text, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 20));
    }

    #[test]
    fn wrap_text_empty_input_yields_single_blank_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
