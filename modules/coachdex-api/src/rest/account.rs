use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::warn;

use coachdex_store::StoreError;

use crate::auth;
use crate::AppState;

const OTP_TTL_MINUTES: i64 = 15;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct SignupBody {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordBody {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordBody {
    pub email: String,
    pub otp: String,
    pub password: String,
}

fn bad_request(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn server_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// POST /api/auth/signup
pub async fn api_signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupBody>,
) -> impl IntoResponse {
    let email = body.email.trim().to_lowercase();
    if !email.contains('@') {
        return bad_request("A valid email address is required");
    }
    if body.password.len() < MIN_PASSWORD_LEN {
        return bad_request("Password must be at least 8 characters");
    }

    let salt = auth::generate_salt();
    let hash = auth::hash_password(&body.password, &salt);

    match state
        .accounts
        .create_user(&email, body.name.as_deref(), &hash, &salt)
        .await
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "id": user.id,
                "email": user.email,
                "name": user.name,
            })),
        )
            .into_response(),
        Err(StoreError::EmailTaken) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": "Email already registered" })),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Signup failed");
            server_error()
        }
    }
}

/// POST /api/auth/login — sets the signed session cookie on success.
pub async fn api_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginBody>,
) -> impl IntoResponse {
    let email = body.email.trim().to_lowercase();

    let user = match state.accounts.find_by_email(&email).await {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "Login lookup failed");
            return server_error();
        }
    };

    let user = match user {
        Some(u) if auth::verify_password(&body.password, &u.password_salt, &u.password_hash) => u,
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Invalid credentials" })),
            )
                .into_response();
        }
    };
    let cookie = auth::session_cookie(&user.email, &state.session_secret);
    (
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "isAdmin": user.is_admin,
        })),
    )
        .into_response()
}

/// POST /api/auth/logout
pub async fn api_logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, auth::clear_session_cookie())],
        Json(serde_json::json!({ "ok": true })),
    )
}

/// POST /api/auth/forgot-password — always 200, whether or not the email
/// exists, so the endpoint can't be used to probe for accounts.
pub async fn api_forgot_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ForgotPasswordBody>,
) -> impl IntoResponse {
    let email = body.email.trim().to_lowercase();

    let user = match state.accounts.find_by_email(&email).await {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, "Forgot-password lookup failed");
            return server_error();
        }
    };

    if let Some(user) = user {
        let otp = auth::generate_otp();
        let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

        if let Err(e) = state
            .accounts
            .create_reset_token(user.id, &auth::hash_otp(&otp), expires_at)
            .await
        {
            warn!(error = %e, "Failed to store reset token");
            return server_error();
        }

        if let Err(e) = state.mailer.send_password_reset(&user.email, &otp).await {
            // The token is stored; the user can retry the email flow.
            warn!(error = %e, "Failed to send reset email");
        }
    }

    Json(serde_json::json!({ "ok": true })).into_response()
}

/// POST /api/auth/reset-password — consumes the OTP; codes are single use.
pub async fn api_reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordBody>,
) -> impl IntoResponse {
    let email = body.email.trim().to_lowercase();
    if body.password.len() < MIN_PASSWORD_LEN {
        return bad_request("Password must be at least 8 characters");
    }

    let user = match state.accounts.find_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return bad_request("Invalid or expired OTP"),
        Err(e) => {
            warn!(error = %e, "Reset-password lookup failed");
            return server_error();
        }
    };

    let tokens = match state.accounts.reset_tokens(user.id).await {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!(error = %e, "Failed to load reset tokens");
            return server_error();
        }
    };

    let now = Utc::now();
    let candidate = auth::hash_otp(body.otp.trim());
    let matched = tokens.iter().find(|t| {
        t.usable_at(now) && auth::constant_time_eq(t.otp_hash.as_bytes(), candidate.as_bytes())
    });

    let Some(token) = matched else {
        return bad_request("Invalid or expired OTP");
    };

    let salt = auth::generate_salt();
    let hash = auth::hash_password(&body.password, &salt);

    let consumed = state.accounts.mark_token_used(token.id).await;
    let updated = state.accounts.set_password(user.id, &hash, &salt).await;
    if let Err(e) = consumed.and(updated) {
        warn!(error = %e, "Failed to finish password reset");
        return server_error();
    }

    Json(serde_json::json!({ "ok": true })).into_response()
}
