// Test utilities shared across modules
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::exchange::{ExchangeError, SessionExchange};
use crate::models::{IdentitySession, IdentityUser};
use crate::settings::{ApplicationSettings, CookieSettings, HomebaseSettings, IdentitySettings};

/// Create a backend session for use in tests
#[must_use]
pub fn create_test_session() -> IdentitySession {
    IdentitySession {
        access_token: "test_access_token".to_string(),
        refresh_token: "test_refresh_token".to_string(),
        token_type: "bearer".to_string(),
        expires_in: 3600,
        expires_at: Utc::now() + Duration::hours(1),
        user: IdentityUser {
            id: "user-123".to_string(),
            email: Some("owner@example.com".to_string()),
        },
    }
}

/// Create test settings for use in unit tests
#[must_use]
pub fn create_test_settings() -> HomebaseSettings {
    HomebaseSettings {
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 8080,
            redirect_base_url: "https://app.example.com".to_string(),
            cors_origins: "https://app.example.com".to_string(),
        },
        identity: IdentitySettings {
            url: "https://id.example.com".to_string(),
            anon_key: Some("test-anon-key".to_string()),
            ..Default::default()
        },
        cookies: CookieSettings {
            secure: true,
            name_prefix: "sb-test".to_string(),
        },
        ..Default::default()
    }
}

/// Outcome a [`MockSessionExchange`] produces
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Success(IdentitySession),
    Rejected,
}

/// In-memory [`SessionExchange`] that records every call
#[derive(Debug)]
pub struct MockSessionExchange {
    outcome: MockOutcome,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl MockSessionExchange {
    #[must_use]
    pub fn succeeding() -> Self {
        Self::with_outcome(MockOutcome::Success(create_test_session()))
    }

    #[must_use]
    pub fn failing() -> Self {
        Self::with_outcome(MockOutcome::Rejected)
    }

    #[must_use]
    pub fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Codes and verifiers the exchange was called with, in order
    ///
    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().expect("call log poisoned").clone()
    }
}

#[async_trait]
impl SessionExchange for MockSessionExchange {
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<IdentitySession, ExchangeError> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push((code.to_string(), code_verifier.map(str::to_string)));

        match &self.outcome {
            MockOutcome::Success(session) => Ok(session.clone()),
            MockOutcome::Rejected => Err(ExchangeError::Rejected {
                status: 400,
                body: r#"{"error":"invalid_grant"}"#.to_string(),
            }),
        }
    }
}
