use std::path::{Path, PathBuf};

use crate::classifier::{ClassifierError, Corpus, Preprocessor};
use crate::cli::PrepareArgs;
use crate::config::PREPROCESSOR_FILE_NAME;
use crate::pipeline::batch::output::write_atomically;
use crate::pipeline::batch::OutputError;

use super::CommandError;

pub const ENCODED_CORPUS_FILE_NAME: &str = "corpus_encoded.csv";

/// Paths written by a `prepare` run.
#[derive(Debug, Clone)]
pub struct PreparedArtifacts {
    pub preprocessor: PathBuf,
    pub encoded_corpus: PathBuf,
    pub samples: usize,
}

/// `vietgender prepare`: fit the preprocessor and export the encoded corpus.
pub fn execute(args: &PrepareArgs) -> Result<PreparedArtifacts, CommandError> {
    if !args.corpus.exists() {
        return Err(CommandError::InputMissing(args.corpus.clone()));
    }
    let artifacts = prepare(&args.corpus, &args.output_dir, args.max_length)?;

    println!("Samples: {}", artifacts.samples);
    println!("Preprocessor: {}", artifacts.preprocessor.display());
    println!("Encoded corpus: {}", artifacts.encoded_corpus.display());
    Ok(artifacts)
}

pub fn prepare(corpus_path: &Path, output_dir: &Path, max_length: usize) -> Result<PreparedArtifacts, CommandError> {
    let corpus = Corpus::load(corpus_path)?;
    let preprocessor = Preprocessor::fit(&corpus, max_length)?;

    std::fs::create_dir_all(output_dir)?;
    let preprocessor_path = output_dir.join(PREPROCESSOR_FILE_NAME);
    preprocessor.save(&preprocessor_path)?;

    let encoded_path = output_dir.join(ENCODED_CORPUS_FILE_NAME);
    write_encoded_corpus(&encoded_path, &corpus, &preprocessor)?;

    tracing::info!(
        samples = corpus.len(),
        classes = ?preprocessor.classes,
        max_length,
        "Corpus prepared"
    );

    Ok(PreparedArtifacts {
        preprocessor: preprocessor_path,
        encoded_corpus: encoded_path,
        samples: corpus.len(),
    })
}

/// Columns `c0..c{max_length-1},label`, one row per corpus sample.
fn write_encoded_corpus(path: &Path, corpus: &Corpus, preprocessor: &Preprocessor) -> Result<(), CommandError> {
    let sequences = preprocessor.encoder().encode_batch(corpus.names());
    let labels = preprocessor.labels();

    let mut writer = csv::Writer::from_writer(Vec::new());
    let header: Vec<String> = (0..preprocessor.max_length)
        .map(|i| format!("c{i}"))
        .chain(std::iter::once("label".to_string()))
        .collect();
    writer.write_record(&header).map_err(OutputError::from)?;

    for (sequence, record) in sequences.iter().zip(&corpus.records) {
        let label = labels.transform(&record.gender).ok_or_else(|| {
            ClassifierError::Corpus(format!("unknown label {:?}", record.gender))
        })?;
        let row: Vec<String> = sequence
            .as_slice()
            .iter()
            .map(u32::to_string)
            .chain(std::iter::once(label.to_string()))
            .collect();
        writer.write_record(&row).map_err(OutputError::from)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Io(e.into_error()))?;
    write_atomically(path, &bytes)?;
    Ok(())
}
