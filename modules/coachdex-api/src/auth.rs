use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

const COOKIE_NAME: &str = "cd_session";
const SESSION_DURATION_SECS: i64 = 7 * 24 * 3600; // 7 days

/// Authenticated user session. Extract this in handlers that require a
/// logged-in user; missing or invalid cookies yield 401.
pub struct UserSession {
    pub email: String,
}

/// Session of a user with the admin flag set. Ingestion endpoints require
/// this; non-admins get 403.
pub struct AdminSession {
    pub email: String,
}

impl FromRequestParts<Arc<AppState>> for UserSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let email = session_email(parts, &state.session_secret).ok_or_else(unauthorized)?;
        Ok(UserSession { email })
    }
}

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let email = session_email(parts, &state.session_secret).ok_or_else(unauthorized)?;

        let user = state
            .accounts
            .find_by_email(&email)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to load user for admin check");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })?
            .ok_or_else(unauthorized)?;

        if !user.is_admin {
            return Err((
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({ "error": "Admin access required" })),
            )
                .into_response());
        }

        Ok(AdminSession { email })
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "Not authenticated" })),
    )
        .into_response()
}

fn session_email(parts: &Parts, secret: &str) -> Option<String> {
    let cookie_header = parts
        .headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let value = parse_cookie(cookie_header, COOKIE_NAME)?;
    verify_session(value, secret)
}

/// Create a signed session cookie value: `email|expiry|signature`
pub fn create_session(email: &str, secret: &str) -> String {
    let expiry = chrono::Utc::now().timestamp() + SESSION_DURATION_SECS;
    let payload = format!("{email}|{expiry}");
    let sig = sign(&payload, secret);
    format!("{payload}|{sig}")
}

/// Build the Set-Cookie header value.
/// In release builds, adds `Secure` flag to prevent transmission over HTTP.
pub fn session_cookie(email: &str, secret: &str) -> String {
    let value = create_session(email, secret);
    let secure = if cfg!(debug_assertions) { "" } else { "; Secure" };
    format!(
        "{COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_DURATION_SECS}{secure}"
    )
}

/// Build a Set-Cookie header that clears the session.
pub fn clear_session_cookie() -> String {
    format!("{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Verify a session cookie value. Returns the email if valid.
fn verify_session(value: &str, secret: &str) -> Option<String> {
    let parts: Vec<&str> = value.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let email = parts[0];
    let expiry_str = parts[1];
    let sig = parts[2];

    let payload = format!("{email}|{expiry_str}");
    let expected_sig = sign(&payload, secret);
    if !constant_time_eq(sig.as_bytes(), expected_sig.as_bytes()) {
        return None;
    }

    let expiry: i64 = expiry_str.parse().ok()?;
    if chrono::Utc::now().timestamp() > expiry {
        return None;
    }

    Some(email.to_string())
}

fn sign(payload: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison to prevent timing attacks.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Parse a specific cookie from the Cookie header string.
fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(name) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value);
            }
        }
    }
    None
}

// --- Credential digests ---

/// Generate a random 16-byte salt, hex-encoded.
pub fn generate_salt() -> String {
    let salt: [u8; 16] = rand::random();
    hex::encode(salt)
}

/// Salted keyed digest of a password. The salt is stored alongside the
/// digest; verification re-derives and compares in constant time.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC can take key of any size");
    mac.update(password.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let candidate = hash_password(password, salt);
    constant_time_eq(candidate.as_bytes(), expected_hash.as_bytes())
}

// --- Password-reset OTPs ---

/// Random 6-digit OTP code, zero-padded.
pub fn generate_otp() -> String {
    let code: u32 = rand::random_range(0..1_000_000);
    format!("{code:06}")
}

/// Plain SHA-256 digest of an OTP code; only the digest is stored.
pub fn hash_otp(otp: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(otp.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "directory-session-secret";

    #[test]
    fn cookie_header_round_trips_to_the_signed_email() {
        let value = create_session("vera@coachdex.de", SECRET);
        let header = format!("theme=dark; {COOKIE_NAME}={value}; lang=de");

        let extracted = parse_cookie(&header, COOKIE_NAME).expect("cookie present");
        assert_eq!(
            verify_session(extracted, SECRET),
            Some("vera@coachdex.de".to_string())
        );
        assert_eq!(parse_cookie("theme=dark; lang=de", COOKIE_NAME), None);
    }

    #[test]
    fn splicing_in_another_email_breaks_the_signature() {
        let value = create_session("vera@coachdex.de", SECRET);
        let (_, rest) = value.split_once('|').expect("payload has segments");
        let forged = format!("root@coachdex.de|{rest}");
        assert_eq!(verify_session(&forged, SECRET), None);
    }

    #[test]
    fn rotating_the_secret_invalidates_open_sessions() {
        let value = create_session("vera@coachdex.de", SECRET);
        assert_eq!(verify_session(&value, "rotated-secret"), None);
    }

    #[test]
    fn stale_expiry_fails_even_with_a_valid_signature() {
        let payload = format!("vera@coachdex.de|{}", chrono::Utc::now().timestamp() - 60);
        let signed = format!("{payload}|{}", sign(&payload, SECRET));
        assert_eq!(verify_session(&signed, SECRET), None);
    }

    #[test]
    fn truncated_values_are_rejected() {
        assert_eq!(verify_session("vera@coachdex.de|12345", SECRET), None);
        assert_eq!(verify_session("", SECRET), None);
    }

    #[test]
    fn password_round_trip() {
        let salt = generate_salt();
        let hash = hash_password("hunter2hunter2", &salt);
        assert!(verify_password("hunter2hunter2", &salt, &hash));
        assert!(!verify_password("wrong-password", &salt, &hash));
    }

    #[test]
    fn different_salts_give_different_hashes() {
        let a = hash_password("same-password", &generate_salt());
        let b = hash_password("same-password", &generate_salt());
        assert_ne!(a, b);
    }

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..50 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn otp_hash_is_deterministic() {
        assert_eq!(hash_otp("123456"), hash_otp("123456"));
        assert_ne!(hash_otp("123456"), hash_otp("654321"));
    }
}
