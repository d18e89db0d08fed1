//! Classification engine for the Enzian/Keckstein code.
//!
//! Pure functions only: composing the four-axis classification string and
//! deriving the severity tier from it. Each axis contributes its own severe
//! marker (P3, O3, T3, C) and the tier is the count of markers present —
//! classifying per axis instead of scanning the concatenated string keeps
//! the result well-defined even if axis enumerations ever grow.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::enums::{DeepEndometriosis, Ovary, Peritoneum, Tube};

/// Severity tier derived from the count of severe axis markers.
/// Ordinal: Leve < Moderado < ModeradoGrave < Grave (declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityTier {
    #[serde(rename = "Leve")]
    Leve,
    #[serde(rename = "Moderado")]
    Moderado,
    #[serde(rename = "Moderado-Grave")]
    ModeradoGrave,
    #[serde(rename = "Grave")]
    Grave,
}

impl SeverityTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Leve => "Leve",
            Self::Moderado => "Moderado",
            Self::ModeradoGrave => "Moderado-Grave",
            Self::Grave => "Grave",
        }
    }

    /// Position in the ordinal scale, 0 (Leve) through 3 (Grave).
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

/// The headline classification: direct concatenation of the four axis codes
/// in fixed order (peritoneum, ovary, tube, deep endometriosis), e.g.
/// "P2O1T1B". Typed axis parameters make a partial code unrepresentable
/// here; the API layer rejects requests with any axis missing before this
/// point, so a partial string is never persisted.
pub fn final_classification(
    peritoneum: Peritoneum,
    ovary: Ovary,
    tube: Tube,
    deep: DeepEndometriosis,
) -> String {
    format!(
        "{}{}{}{}",
        peritoneum.as_str(),
        ovary.as_str(),
        tube.as_str(),
        deep.as_str()
    )
}

/// Severity of a fully specified axis selection.
pub fn severity_tier(
    peritoneum: Peritoneum,
    ovary: Ovary,
    tube: Tube,
    deep: DeepEndometriosis,
) -> SeverityTier {
    let severe_count = [
        peritoneum.is_severe(),
        ovary.is_severe(),
        tube.is_severe(),
        deep.is_severe(),
    ]
    .iter()
    .filter(|severe| **severe)
    .count();

    tier_for_count(severe_count)
}

/// Severity of a stored classification string. The stored value is
/// authoritative for history rows, so this re-derives the axis codes from
/// the 7-character code. Strings that no longer parse (legacy or hand-edited
/// rows) fall back to counting the known severe tokens directly.
pub fn severity_of_code(code: &str) -> SeverityTier {
    if let Some((p, o, t, d)) = parse_code(code) {
        return severity_tier(p, o, t, d);
    }

    let mut severe_count = ["P3", "O3", "T3"]
        .iter()
        .filter(|token| code.contains(**token))
        .count();
    if code.ends_with('C') {
        severe_count += 1;
    }
    tier_for_count(severe_count)
}

/// Split a classification string back into its axis codes. Returns `None`
/// unless the code is exactly 2+2+2+1 well-formed tokens.
pub fn parse_code(code: &str) -> Option<(Peritoneum, Ovary, Tube, DeepEndometriosis)> {
    if code.len() != 7 || !code.is_ascii() {
        return None;
    }
    let peritoneum = Peritoneum::from_str(&code[0..2]).ok()?;
    let ovary = Ovary::from_str(&code[2..4]).ok()?;
    let tube = Tube::from_str(&code[4..6]).ok()?;
    let deep = DeepEndometriosis::from_str(&code[6..7]).ok()?;
    Some((peritoneum, ovary, tube, deep))
}

fn tier_for_count(severe_count: usize) -> SeverityTier {
    match severe_count {
        0 => SeverityTier::Leve,
        1 => SeverityTier::Moderado,
        2 => SeverityTier::ModeradoGrave,
        _ => SeverityTier::Grave,
    }
}
