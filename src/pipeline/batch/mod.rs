//! Batch name-gender prediction.
//!
//! Reads a table of names, classifies each row independently and writes a
//! result table plus a statistics report.
//!
//! ```text
//! ingest → normalize → encode → classify → aggregate → output
//! ```
//!
//! One row never affects another: a row that fails validation or inference
//! becomes an `Unknown` outcome and the run carries on.

pub mod error;
pub mod types;
pub mod ingest;
pub mod runner;
pub mod aggregate;
pub mod output;

pub use error::{BatchError, IngestError, OutputError};
pub use types::*;
pub use ingest::{load_table, LoadedTable, Table, TextEncoding};
pub use runner::{run_full_batch, BatchRunner};
pub use aggregate::{aggregate, BatchStatistics, OutputRow};
pub use output::{stats_path_for, write_report, write_results_csv};
