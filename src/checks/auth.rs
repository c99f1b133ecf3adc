//! Signup and NextAuth checks.

use serde_json::{Value, json};
use tracing::{debug, info};

use super::contract::{Shape, display_field, error_text, expect, field, object};
use super::{CheckContext, CheckError, Verdict, unexpected_status};

const SIGNUP_PATH: &str = "/api/auth/signup";
const CSRF_PATH: &str = "/api/auth/csrf";
const PROVIDERS_PATH: &str = "/api/auth/providers";
const SESSION_PATH: &str = "/api/auth/session";
const CREDENTIALS_CALLBACK_PATH: &str = "/api/auth/callback/credentials";

const USER_EXISTS: &str = "User already exists";

/// `POST /api/auth/signup`: 201 with `{userId, message}`, or 400 because the
/// user is already registered.
pub async fn check_signup(ctx: &mut CheckContext) -> Result<Verdict, CheckError> {
    let response = ctx.session.post_json(SIGNUP_PATH, &ctx.fixtures.user).await?;

    match response.status {
        201 => {
            let body = response.json()?;
            let required = [field("userId"), field("message")];
            let verdict = match expect(response.status, 201, &body, &required) {
                Shape::Matched(map) => Verdict::pass(format!(
                    "User created successfully with ID: {}",
                    display_field(map, "userId")
                )),
                _ => Verdict::fail("Response missing required fields"),
            };
            Ok(verdict.with_data(body))
        }
        400 => {
            let body = response.json()?;
            if error_text(&body).contains(USER_EXISTS) {
                return Ok(ctx.mode.already_exists(USER_EXISTS, body));
            }
            Ok(Verdict::fail(format!("Bad request: {}", error_text(&body))).with_data(body))
        }
        _ => Ok(unexpected_status(&response)),
    }
}

/// NextAuth wiring: CSRF token, a `credentials` provider, and a reachable
/// session endpoint. With sign-in enabled, also authenticates the session
/// with the fixture user so later checks run as that user.
pub async fn check_login(ctx: &mut CheckContext) -> Result<Verdict, CheckError> {
    let response = ctx.session.get(CSRF_PATH).await?;
    if response.status != 200 {
        return Ok(Verdict::fail(format!("CSRF endpoint failed: {}", response.status)));
    }
    let csrf = response.json()?;
    let Some(csrf_token) = csrf.get("csrfToken").and_then(Value::as_str).map(str::to_owned) else {
        return Ok(Verdict::fail("No CSRF token in response").with_data(csrf));
    };

    let response = ctx.session.get(PROVIDERS_PATH).await?;
    if response.status != 200 {
        return Ok(Verdict::fail(format!(
            "Providers endpoint failed: {}",
            response.status
        )));
    }
    let providers = response.json()?;
    if providers.get("credentials").is_none() {
        return Ok(Verdict::fail("Credentials provider not found").with_data(providers));
    }

    if ctx.sign_in {
        if let Some(rejected) = sign_in(ctx, &csrf_token).await? {
            return Ok(rejected);
        }
    }

    let response = ctx.session.get(SESSION_PATH).await?;
    if response.status != 200 {
        return Ok(Verdict::fail(format!(
            "Session endpoint failed: {}",
            response.status
        )));
    }

    if !ctx.sign_in {
        return Ok(Verdict::pass(
            "NextAuth system is properly configured and accessible",
        ));
    }

    let session = response.json()?;
    match expect(response.status, 200, &session, &[object("user")]) {
        Shape::Matched(_) => {
            ctx.session.mark_signed_in();
            info!(email = %ctx.fixtures.user.email, "Session signed in");
            Ok(Verdict::pass(format!(
                "Signed in as {} via credentials provider",
                ctx.fixtures.user.email
            )))
        }
        _ => Ok(Verdict::fail("Session has no user after sign-in").with_data(session)),
    }
}

/// Post the credentials form. `Some` carries the failure verdict when the
/// callback rejects the fixture user.
async fn sign_in(ctx: &CheckContext, csrf_token: &str) -> Result<Option<Verdict>, CheckError> {
    let user = &ctx.fixtures.user;
    let form = [
        ("csrfToken", csrf_token),
        ("email", user.email.as_str()),
        ("password", user.password.as_str()),
        ("json", "true"),
    ];
    let response = ctx
        .session
        .post_form(CREDENTIALS_CALLBACK_PATH, &form)
        .await?;
    debug!(status = response.status, "Credentials callback answered");

    if !(200..300).contains(&response.status) {
        return Ok(Some(
            Verdict::fail(format!("Sign-in failed: {}", response.status)).with_data(response.raw()),
        ));
    }

    let body = response.raw();
    let redirect = body.get("url").and_then(Value::as_str).unwrap_or_default();
    if redirect.contains("error=") {
        return Ok(Some(
            Verdict::fail("Sign-in rejected by credentials provider")
                .with_data(json!({ "url": redirect })),
        ));
    }

    Ok(None)
}
