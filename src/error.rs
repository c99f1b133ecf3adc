//! Process-level errors.
//!
//! Failures of individual checks never surface here; they become failed
//! results in the run report. These are the faults that stop the probe from
//! starting or from delivering its report.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// Base URL could not be used as an HTTP(S) origin
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Report could not be serialized
    #[error("failed to encode run report: {0}")]
    ReportEncode(#[from] serde_json::Error),

    /// Report file could not be written
    #[error("failed to write report file `{}`: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tracing subscriber could not be installed
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
