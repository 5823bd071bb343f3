use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::inputs::InputError;

/// Fatal startup failure: the model artifact could not be located, read, or
/// understood. The app refuses to launch on any of these; there is no
/// recovery path short of supplying a good artifact.
#[derive(Debug, Error)]
pub enum ModelUnavailable {
    #[error("model artifact not found at {path} (set BURNWISE_MODEL_PATH to override)")]
    Missing { path: PathBuf },

    #[error("failed to read model artifact at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("model artifact at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("model artifact at {path} has format version {found}, expected {expected}")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("model artifact at {path} was fitted against a different feature schema: expected [{expected}], found [{found}]")]
    SchemaMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
}

/// Per-request inference failure. Surfaced to the caller in place of a
/// result; the process and any previously rendered outcome stay intact.
#[derive(Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("feature record is missing column \"{0}\"")]
    MissingColumn(String),

    #[error("column \"{column}\" has no level \"{value}\" in the trained model")]
    UnknownLevel { column: String, value: String },

    #[error("column \"{column}\" expected a {expected} value")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    #[error("model produced a non-finite estimate")]
    NonFinite,

    #[error("model produced an implausible estimate ({0} kcal)")]
    ImplausibleEstimate(f64),

    #[error(transparent)]
    Input(#[from] InputError),
}
