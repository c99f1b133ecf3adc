use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::checks::{CheckContext, EndpointCheck, Verdict};

use super::report;
use super::{ResultLog, Tally, TestResult};

/// Default pause between consecutive checks.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Done,
}

/// Outcome of a complete run.
#[derive(Debug)]
pub struct RunSummary {
    pub state: RunState,
    pub results: ResultLog,
    pub tally: Tally,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

/// Runs a fixed list of checks one after another against one context.
///
/// Every check produces exactly one [`TestResult`], whether it passed,
/// failed, or faulted, and a failure never stops the run.
pub struct Runner<'w> {
    ctx: CheckContext,
    delay: Duration,
    echo: Option<&'w mut dyn Write>,
    state: RunState,
    log: ResultLog,
}

impl fmt::Debug for Runner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("ctx", &self.ctx)
            .field("delay", &self.delay)
            .field("echo", &self.echo.is_some())
            .field("state", &self.state)
            .field("log", &self.log)
            .finish()
    }
}

impl<'w> Runner<'w> {
    pub fn new(ctx: CheckContext) -> Self {
        Self {
            ctx,
            delay: DEFAULT_DELAY,
            echo: None,
            state: RunState::Running,
            log: ResultLog::new(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Write a header before each check and a report line as it completes.
    pub fn with_echo(mut self, out: &'w mut dyn Write) -> Self {
        self.echo = Some(out);
        self
    }

    pub async fn run(mut self, checks: &[EndpointCheck]) -> RunSummary {
        let started_at = Local::now();
        info!(
            base_url = self.ctx.session.base_url(),
            mode = %self.ctx.mode,
            checks = checks.len(),
            "Starting run"
        );

        for (index, check) in checks.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.echo_line(&report::format_header(check.name));
            let started = Instant::now();
            let verdict = match check.run(&mut self.ctx).await {
                Ok(verdict) => verdict,
                Err(err) => {
                    warn!(check = check.name, error = %err, "Check faulted");
                    Verdict::fail(format!("Exception occurred: {err}"))
                }
            };
            self.record(check, verdict, started.elapsed());
        }

        self.state = RunState::Done;
        let tally = self.log.tally();
        info!(
            passed = tally.passed,
            failed = tally.failed,
            "Run finished"
        );

        RunSummary {
            state: self.state,
            results: self.log,
            tally,
            started_at,
            finished_at: Local::now(),
        }
    }

    fn record(&mut self, check: &EndpointCheck, verdict: Verdict, elapsed: Duration) {
        let result = TestResult {
            test_name: check.name.to_string(),
            success: verdict.success,
            message: verdict.message,
            timestamp: Local::now(),
            duration_ms: elapsed.as_millis(),
            response_data: verdict.response_data,
        };

        if result.success {
            info!(check = check.name, message = %result.message, "Check passed");
        } else {
            warn!(check = check.name, message = %result.message, "Check failed");
        }
        self.echo_line(&report::format_result(&result));

        self.log.push(result);
    }

    fn echo_line(&mut self, line: &str) {
        if let Some(out) = self.echo.as_mut() {
            if let Err(e) = writeln!(out, "{line}") {
                warn!(error = %e, "Failed to write report line");
            }
        }
    }
}
