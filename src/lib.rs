//! Black-box contract checks for the course portal's HTTP API.
//!
//! A run walks a fixed, ordered list of endpoint checks over one cookie-aware
//! session, records one result per check, and reduces the results to a
//! pass/fail tally and process exit code.

pub mod checks;
pub mod cli;
pub mod error;
pub mod fixtures;
pub mod http;
pub mod logging;
pub mod testing;

pub use checks::{CheckContext, CheckError, CheckKind, EndpointCheck, RunMode, Verdict};
pub use error::ProbeError;
pub use http::Session;
pub use testing::{ResultLog, RunSummary, Runner, Tally, TestResult};
