//! Database connectivity probe exposed by the target application.

use serde_json::Value;

use super::contract::{display_field, error_text};
use super::{CheckContext, CheckError, Verdict, unexpected_status};

const TEST_DB_PATH: &str = "/api/test_db";

/// `GET /api/test_db`: 200 with `{ok: true, db}`, or 500 with the driver's
/// error when the application cannot reach its database.
pub async fn check_database(ctx: &mut CheckContext) -> Result<Verdict, CheckError> {
    let response = ctx.session.get(TEST_DB_PATH).await?;

    match response.status {
        200 => {
            let body = response.json()?;
            let ok = body.get("ok").and_then(Value::as_bool).unwrap_or(false);
            let verdict = match body.as_object() {
                Some(map) if ok => {
                    Verdict::pass(format!("Database reachable ({})", display_field(map, "db")))
                }
                _ => Verdict::fail("Database probe did not report ok"),
            };
            Ok(verdict.with_data(body))
        }
        500 => {
            let body = response.raw();
            Ok(
                Verdict::fail(format!("Database unreachable: {}", error_text(&body)))
                    .with_data(body),
            )
        }
        _ => Ok(unexpected_status(&response)),
    }
}
