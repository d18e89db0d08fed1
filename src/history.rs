//! Per-patient diagnosis history: severity tiers and trend indicators.
//!
//! Pure read-time computation over already-persisted records. The input is
//! the patient's diagnoses ordered newest first, exactly as the repository
//! returns them; each entry except the oldest gets a trend against the
//! next-older record.

use serde::Serialize;

use crate::classification::{severity_of_code, SeverityTier};
use crate::models::DiagnosisWithRefs;

/// Direction of change between two consecutive diagnoses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

/// One history row: the diagnosis plus its derived severity and, when a
/// predecessor exists, the trend relative to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub diagnosis: DiagnosisWithRefs,
    pub severity: SeverityTier,
    pub trend: Option<Trend>,
}

/// Header figures for the history view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total: usize,
    pub latest_classification: Option<String>,
    pub latest_severity: Option<SeverityTier>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientHistory {
    pub summary: HistorySummary,
    pub entries: Vec<HistoryEntry>,
}

/// Trend of `current` against the chronologically previous record.
pub fn trend_between(current: SeverityTier, previous: SeverityTier) -> Trend {
    if current.rank() > previous.rank() {
        Trend::Worsening
    } else if current.rank() < previous.rank() {
        Trend::Improving
    } else {
        Trend::Stable
    }
}

/// Assemble the history view from diagnoses ordered newest first.
pub fn assemble_history(diagnoses: Vec<DiagnosisWithRefs>) -> PatientHistory {
    let tiers: Vec<SeverityTier> = diagnoses
        .iter()
        .map(|d| severity_of_code(&d.diagnosis.final_classification))
        .collect();

    let summary = HistorySummary {
        total: diagnoses.len(),
        latest_classification: diagnoses
            .first()
            .map(|d| d.diagnosis.final_classification.clone()),
        latest_severity: tiers.first().copied(),
    };

    let entries = diagnoses
        .into_iter()
        .enumerate()
        .map(|(i, diagnosis)| {
            // The next index is the next-older record; the oldest has none.
            let trend = tiers.get(i + 1).map(|older| trend_between(tiers[i], *older));
            HistoryEntry {
                diagnosis,
                severity: tiers[i],
                trend,
            }
        })
        .collect();

    PatientHistory { summary, entries }
}
