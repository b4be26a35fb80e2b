use chrono::{DateTime, Utc};

/// One row per issued refresh token. Records are never mutated; a newly
/// issued token supersedes older rows by recency ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshTokenRecord {
    pub account_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// One row per password-reset request. Only the most recent row per account
/// is ever consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordResetRecord {
    pub account_id: i64,
    pub reset_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Append-only audit row, one per authentication attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginAttemptRecord {
    pub account_id: i64,
    pub attempted_at: DateTime<Utc>,
    pub success: bool,
}
