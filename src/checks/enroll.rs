//! Enrollment checks.

use serde_json::json;

use super::contract::{Shape, array, display_field, error_text, expect, field};
use super::{CheckContext, CheckError, Verdict, unexpected_status};

const ENROLL_PATH: &str = "/api/enroll";

const ALREADY_ENROLLED: &str = "Already enrolled";

/// `POST /api/enroll`. Unauthenticated, the endpoint must answer 401.
/// Otherwise 201 with `{enrollmentId, message}`, or 400 when the user is
/// already enrolled in the course.
pub async fn check_enroll(ctx: &mut CheckContext) -> Result<Verdict, CheckError> {
    let response = ctx
        .session
        .post_json(ENROLL_PATH, &ctx.fixtures.course)
        .await?;

    match response.status {
        401 if ctx.session.is_signed_in() => Ok(Verdict::fail(
            "Unauthorized even though the session signed in",
        )
        .with_data(response.raw())),
        401 => Ok(Verdict::pass(
            "API correctly requires authentication (401 Unauthorized)",
        )),
        201 => {
            let body = response.json()?;
            let required = [field("enrollmentId"), field("message")];
            let verdict = match expect(response.status, 201, &body, &required) {
                Shape::Matched(map) => Verdict::pass(format!(
                    "Enrollment successful with ID: {}",
                    display_field(map, "enrollmentId")
                )),
                _ => Verdict::fail("Response missing required fields"),
            };
            Ok(verdict.with_data(body))
        }
        400 => {
            let body = response.json()?;
            if error_text(&body).contains(ALREADY_ENROLLED) {
                return Ok(ctx.mode.already_exists(ALREADY_ENROLLED, body));
            }
            Ok(Verdict::fail(format!("Bad request: {}", error_text(&body))).with_data(body))
        }
        _ => Ok(unexpected_status(&response)),
    }
}

/// `GET /api/enroll`: 200 with an `enrollments` array. Needs an
/// authenticated session to pass.
pub async fn check_list_enrollments(ctx: &mut CheckContext) -> Result<Verdict, CheckError> {
    let response = ctx.session.get(ENROLL_PATH).await?;

    match response.status {
        401 => Ok(Verdict::fail(
            "Unauthorized - authentication required but not provided",
        )),
        200 => {
            let body = response.json()?;
            match expect(response.status, 200, &body, &[array("enrollments")]) {
                Shape::Matched(map) => {
                    let count = map
                        .get("enrollments")
                        .and_then(|value| value.as_array())
                        .map_or(0, Vec::len);
                    Ok(Verdict::pass(format!(
                        "Retrieved {count} enrollments successfully"
                    ))
                    .with_data(json!({ "count": count })))
                }
                _ => Ok(Verdict::fail("Response missing enrollments array").with_data(body)),
            }
        }
        _ => Ok(unexpected_status(&response)),
    }
}
