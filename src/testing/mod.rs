//! # Results & Runner
//!
//! Outcome records for a run, the sequential runner that produces them, and
//! the report rendering on top.

pub mod report;
pub mod runner;

use std::process::ExitCode;
use std::slice;

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

pub use runner::{RunState, RunSummary, Runner};

/// Outcome of one check invocation. Never mutated once appended.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub test_name: String,
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_data: Option<Value>,
}

/// Append-only, ordered history of a run's results.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ResultLog {
    entries: Vec<TestResult>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: TestResult) {
        self.entries.push(result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, TestResult> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[TestResult] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TestResult> {
        self.entries.last()
    }

    /// Count passes and failures by scanning the log.
    pub fn tally(&self) -> Tally {
        let passed = self.entries.iter().filter(|result| result.success).count();
        Tally {
            passed,
            failed: self.entries.len() - passed,
        }
    }
}

impl<'a> IntoIterator for &'a ResultLog {
    type Item = &'a TestResult;
    type IntoIter = slice::Iter<'a, TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Aggregate pass/fail counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// 0 when nothing failed, 1 otherwise.
    pub fn exit_code(&self) -> ExitCode {
        if self.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, success: bool) -> TestResult {
        TestResult {
            test_name: name.into(),
            success,
            message: String::new(),
            timestamp: Local::now(),
            duration_ms: 0,
            response_data: None,
        }
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut log = ResultLog::new();
        log.push(result("Authentication Signup", true));
        log.push(result("Authentication Login", false));

        let names: Vec<_> = log.iter().map(|r| r.test_name.as_str()).collect();
        assert_eq!(names, ["Authentication Signup", "Authentication Login"]);
        assert_eq!(log.last().unwrap().test_name, "Authentication Login");
    }

    #[test]
    fn tally_covers_every_entry() {
        let mut log = ResultLog::new();
        for (i, success) in [true, false, true, true, false].into_iter().enumerate() {
            log.push(result(&format!("check-{i}"), success));
        }

        let tally = log.tally();
        assert_eq!(tally, Tally { passed: 3, failed: 2 });
        assert_eq!(tally.total(), log.len());
        assert!(!tally.all_passed());
    }

    #[test]
    fn empty_log_counts_as_all_passed() {
        let log = ResultLog::new();
        assert!(log.is_empty());
        assert!(log.tally().all_passed());
        assert_eq!(log.tally().exit_code(), ExitCode::SUCCESS);
    }

    #[test]
    fn exit_code_is_failure_when_anything_failed() {
        let tally = Tally { passed: 5, failed: 1 };
        assert_eq!(tally.exit_code(), ExitCode::FAILURE);
    }

    #[test]
    fn result_serializes_without_empty_payload() {
        let value = serde_json::to_value(result("Get Course Progress", true)).unwrap();
        assert_eq!(value["test_name"], "Get Course Progress");
        assert!(value.get("response_data").is_none());
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }
}
