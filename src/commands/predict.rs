use std::io::{BufRead, Write};
use std::path::Path;

use crate::cli::PredictArgs;
use crate::pipeline::batch::{BatchRunner, PredictionOutcome};

use super::{load_runner, CommandError};

/// Words that end an interactive session ("thoát" typed without accents).
const QUIT_WORDS: &[&str] = &["quit", "exit", "thoat", "thoát"];

/// Certainty phrase for a Success confidence.
pub fn certainty(confidence: f32) -> &'static str {
    if confidence > 0.9 {
        "very confident"
    } else if confidence > 0.7 {
        "fairly confident"
    } else if confidence > 0.5 {
        "low confidence"
    } else {
        "not confident"
    }
}

pub fn format_outcome(outcome: &PredictionOutcome) -> String {
    if outcome.is_success() {
        format!(
            "{} -> {} | {} ({:.2}%, {})",
            outcome.raw_name,
            outcome.canonical_name,
            outcome.label,
            outcome.confidence * 100.0,
            certainty(outcome.confidence)
        )
    } else {
        format!(
            "{} -> {} | {} ({})",
            outcome.raw_name, outcome.canonical_name, outcome.label, outcome.status
        )
    }
}

/// `vietgender predict`. Interactive when neither a name nor a file is given.
pub fn execute(args: &PredictArgs) -> Result<(), CommandError> {
    if let Some(file) = &args.file {
        if !file.exists() {
            return Err(CommandError::InputMissing(file.clone()));
        }
    }
    let runner = load_runner(&args.model.model, &args.model.preprocessor)?;
    let mut stdout = std::io::stdout().lock();

    if let Some(name) = &args.name {
        writeln!(stdout, "{}", format_outcome(&runner.predict(name)))?;
    }
    if let Some(file) = &args.file {
        predict_file(&runner, file, &mut stdout)?;
    }
    if args.interactive || (args.name.is_none() && args.file.is_none()) {
        let stdin = std::io::stdin().lock();
        interactive(&runner, stdin, &mut stdout)?;
    }
    Ok(())
}

/// One name per line; blank lines are skipped.
pub fn predict_file(runner: &BatchRunner, path: &Path, out: &mut impl Write) -> Result<usize, CommandError> {
    let text = std::fs::read_to_string(path)?;
    let names: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    tracing::info!(path = %path.display(), count = names.len(), "Predicting names from file");
    for outcome in runner.run(&names) {
        writeln!(out, "{}", format_outcome(&outcome))?;
    }
    Ok(names.len())
}

/// Prompt loop. Ends on a quit word or end of input; an empty line asks again.
pub fn interactive(runner: &BatchRunner, input: impl BufRead, out: &mut impl Write) -> Result<(), CommandError> {
    writeln!(out, "Enter a name to predict its gender ('quit' to stop)")?;
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;
        let name = line.trim();

        if name.is_empty() {
            writeln!(out, "Please enter a name.")?;
            continue;
        }
        if QUIT_WORDS.contains(&name.to_lowercase().as_str()) {
            break;
        }
        writeln!(out, "{}", format_outcome(&runner.predict(name)))?;
    }
    Ok(())
}
