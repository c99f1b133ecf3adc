//! Console and JSON rendering of a run.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::checks::RunMode;
use crate::error::ProbeError;

use super::{RunSummary, TestResult};

const RULE_WIDTH: usize = 60;

/// Machine-readable report of one run.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub base_url: &'a str,
    pub mode: RunMode,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: &'a [TestResult],
}

impl<'a> RunReport<'a> {
    pub fn new(base_url: &'a str, mode: RunMode, summary: &'a RunSummary) -> Self {
        Self {
            base_url,
            mode,
            started_at: summary.started_at,
            finished_at: summary.finished_at,
            total: summary.tally.total(),
            passed: summary.tally.passed,
            failed: summary.tally.failed,
            results: summary.results.as_slice(),
        }
    }

    pub fn to_json(&self) -> Result<String, ProbeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ProbeError> {
        let raw = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ProbeError::Report {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, raw).map_err(|source| ProbeError::Report {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One line per result; failures also show the captured response.
pub fn format_result(result: &TestResult) -> String {
    let status = if result.success { "✅ PASS" } else { "❌ FAIL" };
    let mut line = format!("{status} {}: {}", result.test_name, result.message);
    if !result.success {
        if let Some(data) = &result.response_data {
            line.push_str(&format!("\n   Response: {data}"));
        }
    }
    line
}

/// Section header written before a check runs.
pub fn format_header(name: &str) -> String {
    format!("\n=== Testing {name} ===")
}

pub fn format_banner(base_url: &str, mode: RunMode) -> String {
    [
        "🚀 Starting backend API checks".to_string(),
        format!("Base URL: {base_url}"),
        format!("API Base: {base_url}/api"),
        format!("Mode: {mode}"),
        "=".repeat(RULE_WIDTH),
    ]
    .join("\n")
}

pub fn format_summary(summary: &RunSummary) -> String {
    let tally = summary.tally;
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        String::new(),
        rule.clone(),
        "🏁 TESTING SUMMARY".to_string(),
        rule,
        format!("✅ Passed: {}", tally.passed),
        format!("❌ Failed: {}", tally.failed),
        format!("📊 Total: {}", tally.total()),
    ];
    if tally.all_passed() {
        lines.push("🎉 All tests passed!".to_string());
    } else {
        lines.push(format!(
            "⚠️  {} test(s) failed - see details above",
            tally.failed
        ));
    }
    lines.join("\n")
}
