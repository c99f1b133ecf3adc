//! The `apiprobe` run: session setup, the suite, and report delivery.

use std::io::Write;
use std::process::ExitCode;

use tracing::error;

use crate::checks::{CheckContext, standard_suite};
use crate::error::ProbeError;
use crate::http::Session;
use crate::testing::Runner;
use crate::testing::report::{self, RunReport};

use super::{Cli, OutputFormat};

/// Exit status for an unusable command line.
pub const USAGE_ERROR: u8 = 2;

/// Run the suite described by `cli`, writing the report to `out`.
///
/// Returns 0 when every check passed and the report was delivered, 1 when a
/// check failed or the report could not be written, and 2 when the base URL
/// is unusable.
pub async fn execute<W: Write>(cli: &Cli, out: &mut W) -> ExitCode {
    let session = match Session::new(&cli.base_url, cli.timeout()) {
        Ok(session) => session,
        Err(e @ ProbeError::InvalidBaseUrl { .. }) => {
            eprintln!("error: {e}");
            return ExitCode::from(USAGE_ERROR);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let base_url = session.base_url().to_string();
    let checks = standard_suite(cli.probe_db);
    let ctx = CheckContext::new(session)
        .with_fixtures(cli.fixtures.clone().into_fixtures())
        .with_mode(cli.mode)
        .with_sign_in(cli.sign_in);

    let mut delivered = true;
    let runner = Runner::new(ctx).with_delay(cli.delay());
    let summary = match cli.format {
        OutputFormat::Text => {
            delivered &= emit(out, &report::format_banner(&base_url, cli.mode));
            runner.with_echo(out).run(&checks).await
        }
        OutputFormat::Json => runner.run(&checks).await,
    };

    let run_report = RunReport::new(&base_url, cli.mode, &summary);
    match cli.format {
        OutputFormat::Text => delivered &= emit(out, &report::format_summary(&summary)),
        OutputFormat::Json => match run_report.to_json() {
            Ok(json) => delivered &= emit(out, &json),
            Err(e) => {
                error!(error = %e, "Failed to render report");
                eprintln!("Error: {e}");
                delivered = false;
            }
        },
    }

    if let Some(path) = &cli.report {
        if let Err(e) = run_report.write_to(path) {
            error!(error = %e, "Failed to write report");
            eprintln!("Error: {e}");
            delivered = false;
        }
    }

    if delivered {
        summary.tally.exit_code()
    } else {
        ExitCode::FAILURE
    }
}

fn emit(out: &mut dyn Write, text: &str) -> bool {
    match writeln!(out, "{text}") {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Failed to write report");
            false
        }
    }
}
