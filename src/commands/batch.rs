use crate::cli::BatchArgs;
use crate::pipeline::batch::{
    run_full_batch, stats_path_for, BatchConfig, BatchRun, BatchRunner, BatchStatistics,
};

use super::{load_runner, CommandError};

/// `vietgender batch`: classify a CSV table.
///
/// The input is checked before the classifier is loaded so a typo in the
/// path fails fast.
pub fn execute(args: &BatchArgs) -> Result<BatchRun, CommandError> {
    if !args.input.exists() {
        return Err(CommandError::InputMissing(args.input.clone()));
    }
    let runner = load_runner(&args.model.model, &args.model.preprocessor)?;
    run_with(args, &runner)
}

/// Batch run with an already-loaded runner.
pub fn run_with(args: &BatchArgs, runner: &BatchRunner) -> Result<BatchRun, CommandError> {
    if !args.input.exists() {
        return Err(CommandError::InputMissing(args.input.clone()));
    }
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let config = BatchConfig {
        max_length: runner.encoder().max_length(),
        encoding: args.encoding.clone(),
        column: args.column.clone(),
        write_report: !args.no_report,
        ..BatchConfig::default()
    };

    let run = run_full_batch(&args.input, &args.output, &config, runner)?;

    let stats = BatchStatistics::compute(&run.outcomes);
    println!("Processed {} names in {} ms", stats.total, run.duration_ms);
    println!("Column: {} (encoding: {})", run.column, run.encoding);
    println!(
        "Male: {}, Female: {}, Unknown: {}",
        stats.male.count, stats.female.count, stats.unknown.count
    );
    println!("Results: {}", args.output.display());
    if config.write_report {
        println!("Statistics: {}", stats_path_for(&args.output).display());
    }

    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifierError, NameClassifier};
    use crate::cli::ModelArgs;
    use crate::pipeline::normalize::NameNormalizer;
    use crate::pipeline::sequence::{EncodedSequence, SequenceEncoder};
    use std::path::{Path, PathBuf};

    struct AlwaysFemale;

    impl NameClassifier for AlwaysFemale {
        fn classify(&self, _: &EncodedSequence) -> Result<f32, ClassifierError> {
            Ok(0.1)
        }
    }

    fn runner() -> BatchRunner {
        BatchRunner::new(NameNormalizer::new(), SequenceEncoder::default(), Box::new(AlwaysFemale))
    }

    fn args(input: &Path, output: &Path, no_report: bool) -> BatchArgs {
        BatchArgs {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            column: None,
            encoding: "utf-8".into(),
            model: ModelArgs {
                model: PathBuf::from("missing.onnx"),
                preprocessor: PathBuf::from("missing.json"),
            },
            no_report,
        }
    }

    #[test]
    fn missing_input_fails_before_loading_model() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(&dir.path().join("nope.csv"), &dir.path().join("out.csv"), false);
        assert!(matches!(execute(&a), Err(CommandError::InputMissing(_))));
    }

    #[test]
    fn missing_model_fails_after_input_check() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "name\nLan\n").unwrap();
        let a = args(&input, &dir.path().join("out.csv"), false);
        assert!(matches!(execute(&a), Err(CommandError::Classifier(_))));
    }

    #[test]
    fn creates_output_directory_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "Họ và tên,Tuổi\nchị Lan,30\nThị Mai,25\n").unwrap();
        let output = dir.path().join("nested").join("results.csv");

        let run = run_with(&args(&input, &output, false), &runner()).unwrap();

        assert_eq!(run.column, "Họ và tên");
        assert_eq!(run.outcomes.len(), 2);
        assert!(output.exists());
        assert!(dir.path().join("nested").join("results_stats.txt").exists());
    }

    #[test]
    fn no_report_skips_statistics_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        std::fs::write(&input, "name\nLan\n").unwrap();
        let output = dir.path().join("results.csv");

        run_with(&args(&input, &output, true), &runner()).unwrap();

        assert!(output.exists());
        assert!(!dir.path().join("results_stats.txt").exists());
    }
}
