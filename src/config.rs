use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "VietGender";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed length of every encoded name sequence.
pub const DEFAULT_MAX_LENGTH: usize = 28;

/// Rows between two progress reports during a batch run.
pub const PROGRESS_INTERVAL: usize = 100;

/// Encoding tried first when the caller does not name one.
pub const DEFAULT_ENCODING: &str = "utf-8";

pub const MODEL_FILE_NAME: &str = "gender_model.onnx";
pub const PREPROCESSOR_FILE_NAME: &str = "preprocessor.json";

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "vietgender=info,vietgender_lib=info"
}

/// Filter used with `--verbose`.
pub fn verbose_log_filter() -> &'static str {
    "vietgender=debug,vietgender_lib=debug"
}

/// Get the application data directory.
/// ~/VietGender/ on all platforms, falling back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the models directory (classifier + preprocessor artifacts)
pub fn models_dir() -> PathBuf {
    app_data_dir().join("models")
}

pub fn default_model_path() -> PathBuf {
    models_dir().join(MODEL_FILE_NAME)
}

pub fn default_preprocessor_path() -> PathBuf {
    models_dir().join(PREPROCESSOR_FILE_NAME)
}
