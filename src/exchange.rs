//! Session exchange with the hosted identity backend
//!
//! The callback hands the one-time authorization code (plus the PKCE verifier
//! stored in a cookie when the flow started) to the backend, which answers
//! with a session. Everything past that call belongs to the backend.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{IdentitySession, IdentityUser};
use crate::settings::IdentitySettings;
use crate::utils::logging::LoggingHelper;

/// Session exchange errors
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("authorization code missing")]
    MissingCode,
    #[error("identity backend request failed: {0}")]
    Request(String),
    #[error("identity backend rejected the code with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("identity backend returned an invalid session: {0}")]
    InvalidResponse(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Exchange of an authorization code for a backend session
#[async_trait]
pub trait SessionExchange: Send + Sync {
    /// Exchange a one-time authorization code for a session
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code is empty
    /// - The backend cannot be reached
    /// - The backend rejects the code
    /// - The backend response cannot be parsed
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<IdentitySession, ExchangeError>;
}

#[derive(Debug, Serialize)]
struct PkceExchangeRequest<'a> {
    auth_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_verifier: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    expires_in: Option<i64>,
    user: Option<IdentityUser>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Default session lifetime when the backend omits `expires_in`
const DEFAULT_EXPIRES_IN_SECONDS: i64 = 3600;

impl TokenResponse {
    fn into_session(self) -> Result<IdentitySession, ExchangeError> {
        if self.access_token.is_empty() {
            return Err(ExchangeError::InvalidResponse(
                "empty access_token".to_string(),
            ));
        }
        let user = self
            .user
            .ok_or_else(|| ExchangeError::InvalidResponse("missing user".to_string()))?;

        let expires_in = self
            .expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECONDS);
        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                ExchangeError::InvalidResponse(format!("expires_in out of range: {expires_in}"))
            })?;

        Ok(IdentitySession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type,
            expires_in,
            expires_at,
            user,
        })
    }
}

/// [`SessionExchange`] over the identity backend's HTTP token endpoint
#[derive(Debug, Clone)]
pub struct HttpSessionExchange {
    http_client: reqwest::Client,
    token_url: String,
    anon_key: String,
}

impl HttpSessionExchange {
    /// Build an exchange client from identity settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No anon key is configured
    /// - The HTTP client cannot be constructed
    pub fn from_settings(settings: &IdentitySettings) -> Result<Self, ExchangeError> {
        let anon_key = settings.get_anon_key().ok_or_else(|| {
            ExchangeError::Configuration(
                "identity anon key not configured (set IDENTITY_ANON_KEY or identity.anon_key_env)"
                    .to_string(),
            )
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| ExchangeError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            token_url: settings.token_url(),
            anon_key,
        })
    }

    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl SessionExchange for HttpSessionExchange {
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<IdentitySession, ExchangeError> {
        if code.trim().is_empty() {
            return Err(ExchangeError::MissingCode);
        }

        LoggingHelper::log_exchange_start(code_verifier.is_some());
        let response = self
            .http_client
            .post(&self.token_url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&PkceExchangeRequest {
                auth_code: code,
                code_verifier,
            })
            .send()
            .await
            .map_err(|e| {
                error!("Session exchange request failed: {e}");
                ExchangeError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExchangeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ExchangeError::Request(format!("Failed to read response: {e}")))?;
        debug!("Session exchange response received ({} bytes)", response_text.len());

        let token_response: TokenResponse = serde_json::from_str(&response_text)
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;

        token_response.into_session()
    }
}
