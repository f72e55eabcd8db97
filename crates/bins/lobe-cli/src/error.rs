//! Error type of the command line front end.

use lobe_bsdf::BsdfError;
use std::path::PathBuf;
use thiserror::Error;

/// Anything that can go wrong between the command line and the engine.
#[derive(Debug, Error)]
pub enum CliError {
    /// Filesystem access failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer rejected the input file.
    #[error("failed to read csv {path}: {source}")]
    Csv {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// The input file does not follow the goniometer export layout.
    #[error("malformed input {path} at line {line}: {reason}")]
    MalformedInput {
        /// The file being read.
        path: PathBuf,
        /// 1-based line of the offending record.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A YAML job description or report failed to (de)serialize.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON dump failed to serialize.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// No input file given, neither on the command line nor in the job
    /// description.
    #[error("no input file: pass a CSV path or a job description with an `input` field")]
    MissingInput,

    /// The reconstruction engine rejected the build.
    #[error(transparent)]
    Engine(#[from] BsdfError),
}
