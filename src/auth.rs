use crate::config::AuthSettings;
use crate::schemas::UserName;
use actix_web::{http::header::HeaderValue, HttpRequest};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::num::ParseIntError;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid username or password")]
    InvalidCredentials,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    pub sub: UserName,
    pub iat: i64,
    pub exp: i64,
}

/// Checks the credentials against the configured accounts and issues a token.
pub fn login(username: &str, password: &str, settings: &AuthSettings) -> Result<String, AuthError> {
    let account = settings
        .accounts
        .iter()
        .find(|account| account.username == username)
        .ok_or(AuthError::InvalidCredentials)?;
    let expected = decode_sha256_hex(&account.password_sha256).ok_or_else(|| {
        tracing::warn!(username, "configured password hash is not 64 hex characters");
        AuthError::InvalidCredentials
    })?;
    let computed = Sha256::digest(password.as_bytes());
    // Both digests go through the MAC so the final comparison is constant time.
    let expected = sign(&expected, &settings.secret)?.finalize().into_bytes();
    sign(&computed, &settings.secret)?
        .verify_slice(&expected)
        .map_err(|_| AuthError::InvalidCredentials)?;
    issue_token(username, settings, Utc::now().timestamp())
}

pub fn issue_token(username: &str, settings: &AuthSettings, now: i64) -> Result<String, AuthError> {
    let claims = Claims {
        sub: username.to_string(),
        iat: now,
        exp: now + settings.token_ttl_secs as i64,
    };
    let claims = serde_json::to_vec(&claims).map_err(|_| AuthError::InvalidToken)?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(TOKEN_HEADER),
        URL_SAFE_NO_PAD.encode(claims)
    );
    let signature = sign(signing_input.as_bytes(), &settings.secret)?.finalize().into_bytes();
    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

pub fn verify_token(token: &str, settings: &AuthSettings, now: i64) -> Result<Claims, AuthError> {
    let (signing_input, signature) = token.rsplit_once('.').ok_or(AuthError::InvalidToken)?;
    let (_, claims) = signing_input
        .split_once('.')
        .ok_or(AuthError::InvalidToken)?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::InvalidToken)?;
    sign(signing_input.as_bytes(), &settings.secret)?
        .verify_slice(&signature)
        .map_err(|_| AuthError::InvalidToken)?;

    let claims = URL_SAFE_NO_PAD
        .decode(claims)
        .map_err(|_| AuthError::InvalidToken)?;
    let claims: Claims = serde_json::from_slice(&claims).map_err(|_| AuthError::InvalidToken)?;
    if claims.exp <= now {
        return Err(AuthError::TokenExpired);
    }
    Ok(claims)
}

/// Resolves the user behind the `Authorization: Bearer <token>` header.
pub fn check_authorization(
    request: &HttpRequest,
    settings: &AuthSettings,
) -> Result<UserName, AuthError> {
    let authorization = request
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .map(HeaderValue::to_str)
        .ok_or(AuthError::MissingHeader)?
        .map_err(|_| AuthError::InvalidToken)?;
    let token = authorization
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?;
    let claims = verify_token(token.trim(), settings, Utc::now().timestamp())?;
    Ok(claims.sub)
}

fn sign(content: &[u8], secret: &str) -> Result<HmacSha256, AuthError> {
    let mut hmac_hasher =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::InvalidToken)?;
    hmac_hasher.update(content);
    Ok(hmac_hasher)
}

/// A SHA-256 digest is exactly 64 hex characters; anything else is rejected.
fn decode_sha256_hex(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    hex.chars()
        .collect::<Vec<_>>()
        .chunks(2)
        .map(|n| u8::from_str_radix(&String::from_iter(n), 16))
        .collect::<Result<Vec<u8>, ParseIntError>>()
        .ok()
}
