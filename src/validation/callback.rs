//! Auth callback validation
//!
//! Splits the callback query into the pieces the handler needs, rejecting
//! requests that cannot possibly complete a code exchange.

use log::{debug, error};
use thiserror::Error;

use crate::models::AuthCallbackQuery;

/// Callback query that is ready for a session exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCallback {
    pub code: String,
    /// Untrusted post-login target, still to be checked by the redirect validator
    pub next: Option<String>,
}

/// Why a callback was refused before the exchange
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackRejection {
    #[error("identity provider returned an error: {0}")]
    ProviderError(String),
    #[error("authorization code missing")]
    MissingCode,
    #[error("authorization code empty")]
    EmptyCode,
}

pub struct CallbackValidator;

impl CallbackValidator {
    /// Validate the callback query and extract the authorization code
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The identity provider reported an error instead of a code
    /// - The authorization code is missing or blank
    pub fn validate_and_extract(
        query: &AuthCallbackQuery,
    ) -> Result<ValidatedCallback, CallbackRejection> {
        debug!("Starting auth callback validation");

        if let Some(provider_error) = &query.error {
            error!(
                "Identity provider error on callback: {provider_error} ({})",
                query.error_description.as_deref().unwrap_or("no description")
            );
            return Err(CallbackRejection::ProviderError(provider_error.clone()));
        }

        let code = Self::extract_authorization_code(query)?;

        Ok(ValidatedCallback {
            code,
            next: query.next.clone(),
        })
    }

    fn extract_authorization_code(query: &AuthCallbackQuery) -> Result<String, CallbackRejection> {
        match &query.code {
            Some(code) if code.trim().is_empty() => {
                error!("Empty authorization code received");
                Err(CallbackRejection::EmptyCode)
            }
            Some(code) => Ok(code.clone()),
            None => {
                error!("No authorization code received in auth callback");
                Err(CallbackRejection::MissingCode)
            }
        }
    }
}
