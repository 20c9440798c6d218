use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Query string of `GET /auth/callback`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    /// Where the user wanted to go before signing in (untrusted)
    pub next: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Authenticated user as reported by the identity backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Session handed back by the identity backend after a code exchange.
///
/// Stored as-is in the auth cookie; this service never mints sessions itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySession {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub user: IdentityUser,
}
