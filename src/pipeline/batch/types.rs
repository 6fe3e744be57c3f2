//! Core types for batch name-gender prediction.
//!
//! Lifecycle: raw names → one `PredictionOutcome` per row → output table and
//! `BatchStatistics`.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_ENCODING, DEFAULT_MAX_LENGTH, PROGRESS_INTERVAL};

// ═══════════════════════════════════════════
// Labels and status
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderLabel {
    Male,
    Female,
    Unknown,
}

impl GenderLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for GenderLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionStatus {
    Success,
    InvalidName,
    PredictionFailed,
}

impl PredictionStatus {
    /// Literal written to the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InvalidName => "Invalid name",
            Self::PredictionFailed => "Prediction failed",
        }
    }
}

impl std::fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ═══════════════════════════════════════════
// Per-row outcome
// ═══════════════════════════════════════════

/// Result for one input row. Built once by the runner, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub raw_name: String,
    pub canonical_name: String,
    pub label: GenderLabel,
    /// Probability mass of the winning class; 0.0 when the label is Unknown.
    pub confidence: f32,
    pub status: PredictionStatus,
}

impl PredictionOutcome {
    pub fn invalid(raw_name: &str, canonical_name: String) -> Self {
        Self {
            raw_name: raw_name.to_string(),
            canonical_name,
            label: GenderLabel::Unknown,
            confidence: 0.0,
            status: PredictionStatus::InvalidName,
        }
    }

    pub fn failed(raw_name: &str, canonical_name: String) -> Self {
        Self {
            raw_name: raw_name.to_string(),
            canonical_name,
            label: GenderLabel::Unknown,
            confidence: 0.0,
            status: PredictionStatus::PredictionFailed,
        }
    }

    /// Decide the label from the positive-class probability. Exactly 0.5 is Female.
    pub fn from_probability(raw_name: &str, canonical_name: String, probability: f32) -> Self {
        let (label, confidence) = if probability > 0.5 {
            (GenderLabel::Male, probability)
        } else {
            (GenderLabel::Female, 1.0 - probability)
        };
        Self {
            raw_name: raw_name.to_string(),
            canonical_name,
            label,
            confidence,
            status: PredictionStatus::Success,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PredictionStatus::Success
    }
}

// ═══════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Must equal the loaded encoder's length; a run refuses to start otherwise.
    pub max_length: usize,
    /// Rows between progress log lines; 0 disables them.
    pub progress_interval: usize,
    /// Encoding tried first when reading the input table.
    pub encoding: String,
    /// Name column; inferred from the header when absent.
    pub column: Option<String>,
    pub write_report: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            progress_interval: PROGRESS_INTERVAL,
            encoding: DEFAULT_ENCODING.to_string(),
            column: None,
            write_report: true,
        }
    }
}

// ═══════════════════════════════════════════
// Run summary
// ═══════════════════════════════════════════

/// Everything a finished run produced, plus how the input was read.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub run_id: String,
    pub outcomes: Vec<PredictionOutcome>,
    pub column: String,
    pub encoding: String,
    pub duration_ms: u64,
}
