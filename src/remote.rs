//! Typed client for the external login, price and hanzi services.
//!
//! Responses are parsed into explicit schemas at the boundary; a body that does
//! not match is reported as [`RemoteError::MalformedResponse`].
use reqwest::{StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::schemas::{Credentials, Envelope};
use crate::session::Session;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("not logged in")]
    NotAuthenticated,
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("login rejected: {0}")]
    Rejected(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Tier bounds come back either as numbers or as text such as `"401+"`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TierBound {
    Number(f64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    pub from: TierBound,
    pub to: TierBound,
    pub standard_price: f64,
    pub usage: f64,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PriceCalculation {
    pub total: f64,
    #[serde(rename = "totalWithVAT")]
    pub total_with_vat: f64,
    pub items: Vec<PriceTier>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hanzi {
    pub id: String,
    pub han_viet: String,
    pub pinyin: String,
    pub cantonese: String,
    pub meaning_in_vietnamese: String,
    #[serde(default)]
    pub inserted_order: Option<i64>,
}

fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, RemoteError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.value)
        .map_err(|err| RemoteError::MalformedResponse(err.to_string()))
}

/// Three non-empty base64url segments separated by dots.
pub fn is_jwt_shaped(token: &str) -> bool {
    let segments: Vec<&str> = token.split('.').collect();
    segments.len() == 3
        && segments.iter().all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

/// Extracts the token from a successful login body.
///
/// The service answers 200 with a plain message instead of a token when the
/// credentials are refused.
pub fn parse_login_response(body: &str) -> Result<String, RemoteError> {
    let value: String = parse_envelope(body)?;
    if is_jwt_shaped(&value) {
        Ok(value)
    } else if value.trim().is_empty() {
        Err(RemoteError::MalformedResponse("empty login token".to_string()))
    } else {
        Err(RemoteError::Rejected(value))
    }
}

pub fn parse_price_response(body: &str) -> Result<PriceCalculation, RemoteError> {
    let calculation: PriceCalculation = parse_envelope(body)?;
    if calculation.total < 0.0 || calculation.total_with_vat < calculation.total {
        return Err(RemoteError::MalformedResponse(format!(
            "inconsistent totals {} / {}",
            calculation.total, calculation.total_with_vat
        )));
    }
    Ok(calculation)
}

pub fn parse_hanzi_response(body: &str) -> Result<Vec<Hanzi>, RemoteError> {
    let characters: Vec<Hanzi> = parse_envelope(body)?;
    if let Some(blank) = characters.iter().find(|hanzi| hanzi.id.trim().is_empty()) {
        return Err(RemoteError::MalformedResponse(format!(
            "character without id: {:?}",
            blank.han_viet
        )));
    }
    Ok(characters)
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "value", alias = "message")]
    error: String,
}

#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: Url,
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let base_url =
            Url::parse(base_url).map_err(|err| RemoteError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|err| RemoteError::InvalidUrl(err.to_string()))
    }

    /// Logs in and stores the returned token in `session`.
    pub async fn login(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<(), RemoteError> {
        let payload = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let res = self
            .http
            .post(self.endpoint("user/login")?)
            .json(&payload)
            .send()
            .await?;
        let body = read_body(res).await?;
        let token = parse_login_response(&body)?;
        tracing::info!(username, "logged in");
        session.login(token);
        Ok(())
    }

    pub async fn electric_prices(
        &self,
        usage: f64,
        session: &Session,
    ) -> Result<PriceCalculation, RemoteError> {
        let body = self
            .authorized_get(&format!("electricPrices/usage/{usage}"), session)
            .await?;
        parse_price_response(&body)
    }

    pub async fn random_hanzi(
        &self,
        count: usize,
        session: &Session,
    ) -> Result<Vec<Hanzi>, RemoteError> {
        let body = self
            .authorized_get(&format!("hanzi/random/{count}"), session)
            .await?;
        parse_hanzi_response(&body)
    }

    async fn authorized_get(&self, path: &str, session: &Session) -> Result<String, RemoteError> {
        let authorization = session
            .authorization()
            .ok_or(RemoteError::NotAuthenticated)?;
        let res = self
            .http
            .get(self.endpoint(path)?)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await?;
        read_body(res).await
    }
}

async fn read_body(res: reqwest::Response) -> Result<String, RemoteError> {
    let status = res.status();
    let body = res.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    tracing::warn!(%status, "remote service returned an error");
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized,
        StatusCode::NOT_FOUND => RemoteError::NotFound,
        _ => RemoteError::Server(message),
    })
}
