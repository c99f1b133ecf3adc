//! Course progress checks.

use serde_json::Value;

use super::contract::{Shape, display_field, error_text, expect, object};
use super::{CheckContext, CheckError, Verdict, unexpected_status};

const PROGRESS_PATH: &str = "/api/progress";

/// `PUT /api/progress`: 200 with a `message` saying the update succeeded.
/// A 404 means the user has no enrollment for the course.
pub async fn check_update_progress(ctx: &mut CheckContext) -> Result<Verdict, CheckError> {
    let payload = ctx.fixtures.progress_update();
    let response = ctx.session.put_json(PROGRESS_PATH, &payload).await?;

    match response.status {
        401 => Ok(Verdict::fail(
            "Unauthorized - authentication required but not provided",
        )),
        200 => {
            let body = response.json()?;
            let confirmed = body
                .get("message")
                .and_then(Value::as_str)
                .is_some_and(|message| message.contains("successfully"));
            let verdict = if confirmed {
                Verdict::pass("Progress updated successfully")
            } else {
                Verdict::fail("Unexpected response format")
            };
            Ok(verdict.with_data(body))
        }
        404 => {
            let body = response.json()?;
            Ok(
                Verdict::fail(format!("Enrollment not found: {}", error_text(&body)))
                    .with_data(body),
            )
        }
        _ => Ok(unexpected_status(&response)),
    }
}

/// `GET /api/progress?courseId=...`: 200 with a `progress` object.
pub async fn check_get_progress(ctx: &mut CheckContext) -> Result<Verdict, CheckError> {
    let course_id = ctx.fixtures.course.course_id.as_str();
    let response = ctx
        .session
        .get_with_query(PROGRESS_PATH, &[("courseId", course_id)])
        .await?;

    match response.status {
        401 => Ok(Verdict::fail(
            "Unauthorized - authentication required but not provided",
        )),
        200 => {
            let body = response.json()?;
            let verdict = match expect(response.status, 200, &body, &[object("progress")]) {
                Shape::Matched(map) => {
                    let score = map
                        .get("progress")
                        .and_then(Value::as_object)
                        .map_or_else(|| "N/A".to_string(), |p| display_field(p, "score"));
                    Verdict::pass(format!(
                        "Retrieved progress successfully - Score: {score}"
                    ))
                }
                _ => Verdict::fail("Response missing progress object"),
            };
            Ok(verdict.with_data(body))
        }
        404 => {
            let body = response.json()?;
            Ok(
                Verdict::fail(format!("Enrollment not found: {}", error_text(&body)))
                    .with_data(body),
            )
        }
        400 => {
            let body = response.json()?;
            Ok(Verdict::fail(format!("Bad request: {}", error_text(&body))).with_data(body))
        }
        _ => Ok(unexpected_status(&response)),
    }
}
