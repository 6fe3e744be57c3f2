//! BatchRunner: the per-row pipeline driven over a whole table.
//!
//! normalize → validate → encode → classify → label. Rows run one at a time, in
//! input order. A row that fails is recorded and the loop moves on.

use std::path::Path;
use std::time::Instant;

use super::aggregate::aggregate;
use super::error::BatchError;
use super::ingest::load_table;
use super::output::{stats_path_for, write_report, write_results_csv};
use super::types::*;
use crate::classifier::{ClassifierError, NameClassifier};
use crate::config::PROGRESS_INTERVAL;
use crate::pipeline::normalize::NameNormalizer;
use crate::pipeline::sequence::{EncodedSequence, SequenceEncoder};

pub struct BatchRunner {
    normalizer: NameNormalizer,
    encoder: SequenceEncoder,
    classifier: Box<dyn NameClassifier>,
}

impl BatchRunner {
    pub fn new(
        normalizer: NameNormalizer,
        encoder: SequenceEncoder,
        classifier: Box<dyn NameClassifier>,
    ) -> Self {
        Self {
            normalizer,
            encoder,
            classifier,
        }
    }

    pub fn encoder(&self) -> &SequenceEncoder {
        &self.encoder
    }

    /// Run one raw name through the full pipeline.
    pub fn predict(&self, raw_name: &str) -> PredictionOutcome {
        let canonical = if raw_name.is_empty() {
            String::new()
        } else {
            self.normalizer.clean(raw_name)
        };

        if !self.normalizer.is_valid(&canonical) {
            tracing::debug!(raw = raw_name, "Invalid name, skipping classifier");
            return PredictionOutcome::invalid(raw_name, canonical);
        }

        let sequence = self.encoder.encode(&canonical);
        match self.probability(&sequence) {
            Ok(probability) => PredictionOutcome::from_probability(raw_name, canonical, probability),
            Err(e) => {
                tracing::warn!(raw = raw_name, canonical = %canonical, error = %e, "Prediction failed");
                PredictionOutcome::failed(raw_name, canonical)
            }
        }
    }

    /// Classifier call with the output checked to be a probability.
    fn probability(&self, sequence: &EncodedSequence) -> Result<f32, ClassifierError> {
        let p = self.classifier.classify(sequence)?;
        if (0.0..=1.0).contains(&p) {
            Ok(p)
        } else {
            Err(ClassifierError::InvalidOutput(p))
        }
    }

    pub fn run(&self, raw_names: &[String]) -> Vec<PredictionOutcome> {
        self.run_reporting_every(raw_names, PROGRESS_INTERVAL)
    }

    /// `outcomes[i]` always corresponds to `raw_names[i]`. Progress is logged
    /// every `progress_interval` rows; 0 disables it.
    pub fn run_reporting_every(
        &self,
        raw_names: &[String],
        progress_interval: usize,
    ) -> Vec<PredictionOutcome> {
        let start = Instant::now();
        let total = raw_names.len();
        tracing::info!(total, "Processing names");

        let mut outcomes = Vec::with_capacity(total);
        for (i, raw) in raw_names.iter().enumerate() {
            outcomes.push(self.predict(raw));

            let processed = i + 1;
            if is_progress_tick(processed, progress_interval) {
                let percent = processed as f64 / total as f64 * 100.0;
                tracing::info!("Processed {processed}/{total} names ({percent:.1}%)");
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(total, duration_ms, "Finished processing names");
        outcomes
    }
}

fn is_progress_tick(processed: usize, interval: usize) -> bool {
    interval > 0 && processed % interval == 0
}

/// Load → run → aggregate → write. The top-level batch entry point.
///
/// Input and output failures abort the run; per-row failures do not.
pub fn run_full_batch(
    input: &Path,
    output: &Path,
    config: &BatchConfig,
    runner: &BatchRunner,
) -> Result<BatchRun, BatchError> {
    let encoder_length = runner.encoder().max_length();
    if config.max_length != encoder_length {
        return Err(BatchError::LengthMismatch {
            configured: config.max_length,
            encoder: encoder_length,
        });
    }

    let start = Instant::now();
    let run_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("batch", run_id = %run_id);
    let _guard = span.enter();

    let loaded = load_table(input, config.column.as_deref(), &config.encoding)?;
    let names = loaded.names();

    let outcomes = runner.run_reporting_every(&names, config.progress_interval);
    let (table, stats) = aggregate(&outcomes);

    write_results_csv(output, &table)?;
    if config.write_report {
        write_report(&stats_path_for(output), output, &stats)?;
    }

    Ok(BatchRun {
        run_id,
        outcomes,
        column: loaded.column.name,
        encoding: loaded.encoding.name().to_string(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Deterministic stub: probability from a closure over the sequence.
    struct StubClassifier<F> {
        f: F,
        calls: Arc<AtomicUsize>,
    }

    impl<F> NameClassifier for StubClassifier<F>
    where
        F: Fn(&EncodedSequence) -> Result<f32, ClassifierError> + Send + Sync,
    {
        fn classify(&self, sequence: &EncodedSequence) -> Result<f32, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.f)(sequence)
        }
    }

    fn runner_with<F>(f: F) -> (BatchRunner, Arc<AtomicUsize>)
    where
        F: Fn(&EncodedSequence) -> Result<f32, ClassifierError> + Send + Sync + 'static,
    {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = StubClassifier {
            f,
            calls: calls.clone(),
        };
        let runner = BatchRunner::new(
            NameNormalizer::new(),
            SequenceEncoder::default(),
            Box::new(classifier),
        );
        (runner, calls)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn title_prefixed_name_succeeds() {
        let expected = SequenceEncoder::default().encode("hiếu");
        let (runner, calls) = runner_with(move |seq| {
            assert_eq!(seq, &expected);
            Ok(0.9)
        });

        let outcome = runner.predict("anh Hiếu");
        assert_eq!(outcome.canonical_name, "hiếu");
        assert_eq!(outcome.status, PredictionStatus::Success);
        assert_eq!(outcome.label, GenderLabel::Male);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_name_never_reaches_classifier() {
        let (runner, calls) = runner_with(|_| Ok(0.9));
        let outcome = runner.predict("");
        assert_eq!(outcome.canonical_name, "");
        assert_eq!(outcome.status, PredictionStatus::InvalidName);
        assert_eq!(outcome.label, GenderLabel::Unknown);
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn numeric_name_is_invalid() {
        let (runner, calls) = runner_with(|_| Ok(0.9));
        assert_eq!(runner.predict("12345").status, PredictionStatus::InvalidName);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn one_classifier_error_is_isolated() {
        let bad = SequenceEncoder::default().encode("lỗi");
        let (runner, _) = runner_with(move |seq| {
            if seq == &bad {
                Err(ClassifierError::Inference("boom".into()))
            } else {
                Ok(0.2)
            }
        });

        let input = names(&["anh Hiếu", "lỗi", "", "bác sĩ Trần Thị Hoa"]);
        let outcomes = runner.run(&input);

        assert_eq!(outcomes.len(), input.len());
        let failed = outcomes
            .iter()
            .filter(|o| o.status == PredictionStatus::PredictionFailed)
            .count();
        assert_eq!(failed, 1);
        assert_eq!(outcomes[1].status, PredictionStatus::PredictionFailed);
        assert_eq!(outcomes[1].confidence, 0.0);
        assert_eq!(outcomes[2].status, PredictionStatus::InvalidName);
        for (outcome, raw) in outcomes.iter().zip(&input) {
            assert_eq!(&outcome.raw_name, raw);
        }
    }

    #[test]
    fn malformed_probability_is_a_failure() {
        for bad in [f32::NAN, 1.5, -0.1] {
            let (runner, _) = runner_with(move |_| Ok(bad));
            let outcome = runner.predict("Nam");
            assert_eq!(outcome.status, PredictionStatus::PredictionFailed, "p = {bad}");
            assert_eq!(outcome.label, GenderLabel::Unknown);
        }
    }

    #[test]
    fn success_confidence_is_winning_mass() {
        for p in [0.0f32, 0.1, 0.49, 0.51, 0.75, 1.0] {
            let (runner, _) = runner_with(move |_| Ok(p));
            let outcome = runner.predict("Lan");
            assert!(outcome.confidence > 0.5 && outcome.confidence <= 1.0, "p = {p}");
        }
    }

    #[test]
    fn progress_ticks_on_interval_multiples() {
        let ticks: Vec<usize> = (1..=5).filter(|&n| is_progress_tick(n, 2)).collect();
        assert_eq!(ticks, vec![2, 4]);
        assert!(!(1..=5).any(|n| is_progress_tick(n, 0)));
    }

    #[test]
    fn disabled_progress_keeps_results() {
        let (runner, _) = runner_with(|_| Ok(0.7));
        let input = names(&["a", "b", "c"]);
        assert_eq!(runner.run_reporting_every(&input, 0), runner.run(&input));
    }

    #[test]
    fn rerun_is_identical() {
        let (runner, _) = runner_with(|seq| Ok((seq.content_len() % 10) as f32 / 10.0));
        let input = names(&["anh Hiếu", "Trần Thị Hoa", "", "Lê Minh Tuấn"]);
        assert_eq!(runner.run(&input), runner.run(&input));
    }

    #[test]
    fn full_batch_writes_table_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("names.csv");
        std::fs::write(
            &input,
            "name\nanh Hiếu\nchị Thương\nNguyễn Văn Nam\nbác sĩ Trần Thị Hoa\n",
        )
        .unwrap();
        let output = dir.path().join("out").join("results.csv");
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();

        let (runner, _) = runner_with(|_| Ok(0.95));
        let run = run_full_batch(&input, &output, &BatchConfig::default(), &runner).unwrap();

        assert_eq!(run.outcomes.len(), 4);
        assert_eq!(run.column, "name");
        assert_eq!(run.encoding, "utf-8");

        let written = std::fs::read_to_string(&output).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("raw_name,clean_name,gender_pred,confidence,status"));
        assert_eq!(lines.count(), 4);
        assert!(written.contains(",hiếu,"));

        let report = std::fs::read_to_string(dir.path().join("out").join("results_stats.txt")).unwrap();
        assert!(report.contains("Total names: 4"));
    }

    #[test]
    fn full_batch_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("results.csv");
        let (runner, _) = runner_with(|_| Ok(0.5));

        let err = run_full_batch(
            &dir.path().join("missing.csv"),
            &output,
            &BatchConfig::default(),
            &runner,
        )
        .unwrap_err();

        assert!(matches!(err, BatchError::Ingest(_)));
        assert!(!output.exists());
    }

    #[test]
    fn full_batch_rejects_mismatched_length() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("names.csv");
        std::fs::write(&input, "name\nLan\n").unwrap();
        let output = dir.path().join("results.csv");
        let (runner, calls) = runner_with(|_| Ok(0.5));
        let config = BatchConfig {
            max_length: 12,
            ..BatchConfig::default()
        };

        let err = run_full_batch(&input, &output, &config, &runner).unwrap_err();

        assert!(matches!(
            err,
            BatchError::LengthMismatch { configured: 12, encoder: 28 }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!output.exists());
    }
}
