//! # Endpoint Checks
//!
//! Each check issues the request(s) for one API operation through the shared
//! [`Session`], then classifies the response against the contract that
//! operation is expected to honor. Checks never panic on a bad response; a
//! fault is returned as a [`CheckError`] and the runner records it as a
//! failure.

pub mod auth;
pub mod contract;
pub mod database;
pub mod enroll;
pub mod progress;

use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::fixtures::Fixtures;
use crate::http::{HttpMethod, Session};

/// Faults that stop a check before it can classify a response.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Connection refused, DNS failure, timeout, or a body that could not be read
    #[error("{method} {path} failed: {source}")]
    Transport {
        method: HttpMethod,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body was expected to be JSON and was not
    #[error("{method} {path} returned {status} with a non-JSON body: {source}")]
    Decode {
        method: HttpMethod,
        path: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Classification of one check's response(s).
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub success: bool,
    pub message: String,
    pub response_data: Option<Value>,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            response_data: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            response_data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.response_data = Some(data);
        self
    }
}

/// How pre-existing state in the target environment is judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// "Already exists" answers pass, so the suite can be re-run against a
    /// shared, already-populated environment.
    #[default]
    Idempotent,
    /// The environment is expected to be empty; "already exists" answers fail.
    Fresh,
}

impl RunMode {
    /// Verdict for a 4xx meaning the resource is already there.
    pub(crate) fn already_exists(self, what: &str, body: Value) -> Verdict {
        let verdict = match self {
            RunMode::Idempotent => Verdict::pass(format!("{what} (expected behavior)")),
            RunMode::Fresh => {
                Verdict::fail(format!("{what}, but a fresh environment was expected"))
            }
        };
        verdict.with_data(body)
    }
}

impl Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunMode::Idempotent => "idempotent",
            RunMode::Fresh => "fresh",
        };
        write!(f, "{label}")
    }
}

/// Everything a check may touch. Owned by the runner for one run and lent to
/// one check at a time.
#[derive(Debug)]
pub struct CheckContext {
    pub session: Session,
    pub fixtures: Fixtures,
    pub mode: RunMode,
    pub sign_in: bool,
}

impl CheckContext {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            fixtures: Fixtures::default(),
            mode: RunMode::default(),
            sign_in: false,
        }
    }

    pub fn with_fixtures(mut self, fixtures: Fixtures) -> Self {
        self.fixtures = fixtures;
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_sign_in(mut self, sign_in: bool) -> Self {
        self.sign_in = sign_in;
        self
    }
}

/// The API operations the suite knows how to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    DatabaseProbe,
    Signup,
    Login,
    Enroll,
    ListEnrollments,
    UpdateProgress,
    GetProgress,
}

/// A named check in the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointCheck {
    pub name: &'static str,
    pub kind: CheckKind,
}

impl EndpointCheck {
    pub const fn new(name: &'static str, kind: CheckKind) -> Self {
        Self { name, kind }
    }

    pub async fn run(&self, ctx: &mut CheckContext) -> Result<Verdict, CheckError> {
        match self.kind {
            CheckKind::DatabaseProbe => database::check_database(ctx).await,
            CheckKind::Signup => auth::check_signup(ctx).await,
            CheckKind::Login => auth::check_login(ctx).await,
            CheckKind::Enroll => enroll::check_enroll(ctx).await,
            CheckKind::ListEnrollments => enroll::check_list_enrollments(ctx).await,
            CheckKind::UpdateProgress => progress::check_update_progress(ctx).await,
            CheckKind::GetProgress => progress::check_get_progress(ctx).await,
        }
    }
}

const DATABASE_PROBE: EndpointCheck = EndpointCheck::new("Database Probe", CheckKind::DatabaseProbe);

const STANDARD_CHECKS: [EndpointCheck; 6] = [
    EndpointCheck::new("Authentication Signup", CheckKind::Signup),
    EndpointCheck::new("Authentication Login", CheckKind::Login),
    EndpointCheck::new("Course Enrollment", CheckKind::Enroll),
    EndpointCheck::new("Get User Enrollments", CheckKind::ListEnrollments),
    EndpointCheck::new("Update Course Progress", CheckKind::UpdateProgress),
    EndpointCheck::new("Get Course Progress", CheckKind::GetProgress),
];

/// The fixed, ordered suite. The database probe runs first when requested.
pub fn standard_suite(probe_db: bool) -> Vec<EndpointCheck> {
    let mut checks = Vec::with_capacity(STANDARD_CHECKS.len() + 1);
    if probe_db {
        checks.push(DATABASE_PROBE);
    }
    checks.extend(STANDARD_CHECKS);
    checks
}

/// Failure for a status code outside the check's decision table.
pub(crate) fn unexpected_status(response: &crate::http::ApiResponse) -> Verdict {
    Verdict::fail(format!("Unexpected status code: {}", response.status)).with_data(response.raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn suite_order_is_fixed() {
        let names: Vec<_> = standard_suite(false).iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            [
                "Authentication Signup",
                "Authentication Login",
                "Course Enrollment",
                "Get User Enrollments",
                "Update Course Progress",
                "Get Course Progress",
            ]
        );
    }

    #[test]
    fn database_probe_runs_first() {
        let suite = standard_suite(true);
        assert_eq!(suite.len(), 7);
        assert_eq!(suite[0].kind, CheckKind::DatabaseProbe);
        assert_eq!(suite[1].kind, CheckKind::Signup);
    }

    #[test]
    fn already_exists_depends_on_mode() {
        let body = json!({"error": "User already exists"});

        let verdict = RunMode::Idempotent.already_exists("User already exists", body.clone());
        assert!(verdict.success);
        assert_eq!(verdict.message, "User already exists (expected behavior)");

        let verdict = RunMode::Fresh.already_exists("User already exists", body.clone());
        assert!(!verdict.success);
        assert_eq!(verdict.response_data, Some(body));
    }

    #[test]
    fn verdict_builders() {
        let verdict =
            Verdict::fail("Bad request: Invalid email").with_data(json!({"error": "Invalid email"}));
        assert!(!verdict.success);
        assert!(verdict.response_data.is_some());
        assert!(Verdict::pass("ok").response_data.is_none());
    }
}
