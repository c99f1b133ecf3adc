//! # Command Line
//!
//! Flags for pointing the suite at an environment and shaping its output.
//! Every flag has a default, so a bare `apiprobe` runs the standard suite
//! against the default deployment.

pub mod run;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, ValueEnum};

use crate::checks::RunMode;
use crate::fixtures::{
    DEFAULT_COURSE_ID, DEFAULT_COURSE_NAME, DEFAULT_USER_EMAIL, DEFAULT_USER_NAME,
    DEFAULT_USER_PASSWORD, Fixtures, ProgressSnapshot, TestCourse, TestUser,
};

pub const DEFAULT_BASE_URL: &str = "https://eduportal-172.preview.emergentagent.com";

/// Contract checks for the course portal's auth, enrollment and progress API
#[derive(Parser, Debug)]
#[command(name = "apiprobe")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    APIPROBE_BASE_URL       Target deployment
    APIPROBE_DELAY_MS       Pause between checks (default: 500)
    APIPROBE_TIMEOUT_SECS   Per-request timeout (default: none)
    APIPROBE_MODE           idempotent | fresh (default: idempotent)
    APIPROBE_SIGN_IN        Sign in with the test user (default: false)
    APIPROBE_LOG            Diagnostic log filter on stderr (default: warn)

EXIT STATUS:
    0 when every check passed, 1 when any check failed, 2 on usage errors
"#)]
pub struct Cli {
    /// Base URL of the deployment under test
    #[arg(long, env = "APIPROBE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Milliseconds to wait between consecutive checks
    #[arg(long, env = "APIPROBE_DELAY_MS", default_value_t = 500)]
    pub delay_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "APIPROBE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// How "already exists" answers are judged
    #[arg(long, env = "APIPROBE_MODE", value_enum, default_value_t = RunMode::Idempotent)]
    pub mode: RunMode,

    /// Sign in through the credentials provider during the login check
    #[arg(long, env = "APIPROBE_SIGN_IN")]
    pub sign_in: bool,

    /// Probe the application's database route before the suite
    #[arg(long)]
    pub probe_db: bool,

    /// Output format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub fixtures: FixtureArgs,
}

impl Cli {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Output format for the run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per check plus a summary
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Sample data submitted by the suite.
#[derive(Args, Debug, Clone)]
pub struct FixtureArgs {
    /// Display name of the test user
    #[arg(long = "name", env = "APIPROBE_USER_NAME", default_value = DEFAULT_USER_NAME)]
    pub user_name: String,

    /// Email of the test user
    #[arg(long = "email", env = "APIPROBE_USER_EMAIL", default_value = DEFAULT_USER_EMAIL)]
    pub user_email: String,

    /// Password of the test user
    #[arg(
        long = "password",
        env = "APIPROBE_USER_PASSWORD",
        default_value = DEFAULT_USER_PASSWORD,
        hide_env_values = true
    )]
    pub user_password: String,

    /// Course to enroll in and track progress for
    #[arg(long, default_value = DEFAULT_COURSE_ID)]
    pub course_id: String,

    /// Course name sent with the enrollment
    #[arg(long, default_value = DEFAULT_COURSE_NAME)]
    pub course_name: String,
}

impl FixtureArgs {
    pub fn into_fixtures(self) -> Fixtures {
        Fixtures {
            user: TestUser {
                name: self.user_name,
                email: self.user_email,
                password: self.user_password,
            },
            course: TestCourse {
                course_id: self.course_id,
                course_name: self.course_name,
            },
            progress: ProgressSnapshot::default(),
        }
    }
}
