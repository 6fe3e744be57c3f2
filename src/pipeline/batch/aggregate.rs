//! Result aggregation: output rows plus derived statistics.
//!
//! Rate denominators differ on purpose. Status and label rates divide by the
//! total row count. Confidence bands divide by the successful-row count, so
//! the three bands always sum to 100% of successes.

use serde::Serialize;

use super::types::{GenderLabel, PredictionOutcome};

/// Band boundaries over Success-row confidence.
pub mod bands {
    /// Strictly above: high.
    pub const HIGH: f32 = 0.90;
    /// At or above (up to HIGH inclusive): medium. Below: low.
    pub const MEDIUM: f32 = 0.70;
}

/// One line of the output table. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub raw_name: String,
    pub clean_name: String,
    pub gender_pred: &'static str,
    pub confidence: f32,
    pub status: &'static str,
}

impl From<&PredictionOutcome> for OutputRow {
    fn from(o: &PredictionOutcome) -> Self {
        Self {
            raw_name: o.raw_name.clone(),
            clean_name: o.canonical_name.clone(),
            gender_pred: o.label.as_str(),
            confidence: o.confidence,
            status: o.status.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CountRate {
    pub count: usize,
    /// Percentage of the relevant denominator, 0.0 when it is empty.
    pub rate: f64,
}

impl CountRate {
    fn of(count: usize, denominator: usize) -> Self {
        let rate = if denominator == 0 {
            0.0
        } else {
            count as f64 / denominator as f64 * 100.0
        };
        Self { count, rate }
    }
}

/// Summary of a finished run. Derived once from the outcomes, read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStatistics {
    pub total: usize,
    pub success: CountRate,
    pub failed: CountRate,
    pub male: CountRate,
    pub female: CountRate,
    pub unknown: CountRate,
    /// Mean over Success rows only; 0.0 without successes.
    pub mean_confidence: f64,
    pub high_confidence: CountRate,
    pub medium_confidence: CountRate,
    pub low_confidence: CountRate,
}

impl BatchStatistics {
    pub fn compute(outcomes: &[PredictionOutcome]) -> Self {
        let total = outcomes.len();

        let confidences: Vec<f32> = outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.confidence)
            .collect();
        let successful = confidences.len();

        let label_count =
            |label: GenderLabel| outcomes.iter().filter(|o| o.label == label).count();

        let mean_confidence = if successful == 0 {
            0.0
        } else {
            confidences.iter().map(|&c| c as f64).sum::<f64>() / successful as f64
        };

        let high = confidences.iter().filter(|&&c| c > bands::HIGH).count();
        let medium = confidences
            .iter()
            .filter(|&&c| (bands::MEDIUM..=bands::HIGH).contains(&c))
            .count();
        let low = confidences.iter().filter(|&&c| c < bands::MEDIUM).count();

        Self {
            total,
            success: CountRate::of(successful, total),
            failed: CountRate::of(total - successful, total),
            male: CountRate::of(label_count(GenderLabel::Male), total),
            female: CountRate::of(label_count(GenderLabel::Female), total),
            unknown: CountRate::of(label_count(GenderLabel::Unknown), total),
            mean_confidence,
            high_confidence: CountRate::of(high, successful),
            medium_confidence: CountRate::of(medium, successful),
            low_confidence: CountRate::of(low, successful),
        }
    }

    /// Human-readable plain-text report.
    pub fn render(&self, output_name: &str) -> String {
        let line = |label: &str, cr: &CountRate| format!("- {label}: {} ({:.1}%)", cr.count, cr.rate);
        let band = |label: &str, cr: &CountRate| {
            format!("- {label}: {} ({:.1}% of successful predictions)", cr.count, cr.rate)
        };

        [
            "=== GENDER PREDICTION STATISTICS ===".to_string(),
            format!("Result file: {output_name}"),
            String::new(),
            "Overview:".to_string(),
            format!("- Total names: {}", self.total),
            line("Successful predictions", &self.success),
            line("Failed predictions", &self.failed),
            String::new(),
            "Gender distribution:".to_string(),
            line("Male", &self.male),
            line("Female", &self.female),
            line("Unknown", &self.unknown),
            String::new(),
            "Confidence:".to_string(),
            format!("- Average confidence: {:.2}%", self.mean_confidence * 100.0),
            band("High confidence (>90%)", &self.high_confidence),
            band("Medium confidence (70-90%)", &self.medium_confidence),
            band("Low confidence (<70%)", &self.low_confidence),
        ]
        .join("\n")
    }
}

/// Output rows in input order plus their statistics.
pub fn aggregate(outcomes: &[PredictionOutcome]) -> (Vec<OutputRow>, BatchStatistics) {
    let rows = outcomes.iter().map(OutputRow::from).collect();
    (rows, BatchStatistics::compute(outcomes))
}
