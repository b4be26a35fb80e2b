use std::collections::BTreeSet;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signing and lifetime parameters for every token kind. Passed explicitly
/// into the components that need it; there is no ambient configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub signing_key: Secret<String>,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub reset_ttl_seconds: i64,
}

impl JwtConfig {
    fn key_bytes(&self) -> &[u8] {
        self.signing_key.expose_secret().as_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    #[serde(rename = "access")]
    Access,
    #[serde(rename = "refresh")]
    Refresh,
    #[serde(rename = "password-reset")]
    PasswordReset,
}

/// Standard claims plus the discriminating `type` claim. Access and refresh
/// tokens also carry the account's role names in `groups`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeSet<String>>,
}

#[derive(Debug, Error, PartialEq)]
pub enum TokenCodecError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Access/refresh pair handed back by login and refresh. `expires_in` is
/// the access-token lifetime in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Creates and parses the three signed token kinds. Stateless: output is a
/// pure function of the inputs, the signing key and the clock.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config: JwtConfig,
}

impl TokenCodec {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn issue_access(
        &self,
        account_id: i64,
        roles: &BTreeSet<String>,
    ) -> Result<String, TokenCodecError> {
        self.issue(
            account_id,
            TokenKind::Access,
            Some(roles.clone()),
            self.config.access_ttl_seconds,
        )
    }

    pub fn issue_refresh(
        &self,
        account_id: i64,
        roles: &BTreeSet<String>,
    ) -> Result<String, TokenCodecError> {
        self.issue(
            account_id,
            TokenKind::Refresh,
            Some(roles.clone()),
            self.config.refresh_ttl_seconds,
        )
    }

    pub fn issue_reset(&self, account_id: i64) -> Result<String, TokenCodecError> {
        self.issue(
            account_id,
            TokenKind::PasswordReset,
            None,
            self.config.reset_ttl_seconds,
        )
    }

    fn issue(
        &self,
        account_id: i64,
        kind: TokenKind,
        groups: Option<BTreeSet<String>>,
        ttl_seconds: i64,
    ) -> Result<String, TokenCodecError> {
        let now = Utc::now();
        let ttl = chrono::Duration::try_seconds(ttl_seconds)
            .ok_or_else(|| TokenCodecError::Signing("token lifetime out of range".to_owned()))?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenCodecError::Signing("token expiry out of range".to_owned()))?;

        let claims = Claims {
            iss: self.config.issuer.clone(),
            sub: account_id.to_string(),
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            kind,
            groups,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.key_bytes()),
        )
        .map_err(|e| TokenCodecError::Signing(e.to_string()))
    }

    /// Verifies signature, expiry, audience and issuer, then the `type`
    /// claim, and finally parses the subject as an account id. Every
    /// failure collapses to [`TokenCodecError::InvalidToken`].
    pub fn parse_subject(&self, token: &str, expected: TokenKind) -> Result<i64, TokenCodecError> {
        let claims = self.decode(token)?;
        if claims.kind != expected {
            return Err(TokenCodecError::InvalidToken);
        }
        claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenCodecError::InvalidToken)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenCodecError> {
        let mut validation = Validation::default();
        validation.set_audience(&[self.config.audience.as_str()]);
        validation.set_issuer(&[self.config.issuer.as_str()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.key_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| TokenCodecError::InvalidToken)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn jwt_config() -> JwtConfig {
        JwtConfig {
            issuer: "https://keyforge.test".to_owned(),
            audience: "keyforge".to_owned(),
            signing_key: Secret::from("test-signing-key".to_owned()),
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 86_400,
            reset_ttl_seconds: 1800,
        }
    }

    fn roles() -> BTreeSet<String> {
        BTreeSet::from(["USER".to_owned()])
    }

    #[test]
    fn access_token_round_trips_subject_and_roles() {
        let codec = TokenCodec::new(jwt_config());
        let token = codec.issue_access(42, &roles()).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.groups, Some(roles()));
        assert_eq!(codec.parse_subject(&token, TokenKind::Access), Ok(42));
    }

    #[test]
    fn reset_token_carries_no_groups() {
        let codec = TokenCodec::new(jwt_config());
        let token = codec.issue_reset(7).unwrap();
        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.kind, TokenKind::PasswordReset);
        assert_eq!(claims.groups, None);
    }

    #[test]
    fn kind_mismatch_is_an_invalid_token() {
        let codec = TokenCodec::new(jwt_config());
        let refresh = codec.issue_refresh(42, &roles()).unwrap();
        assert_eq!(
            codec.parse_subject(&refresh, TokenKind::Access),
            Err(TokenCodecError::InvalidToken)
        );
    }

    #[test]
    fn garbage_is_an_invalid_token() {
        let codec = TokenCodec::new(jwt_config());
        assert_eq!(
            codec.parse_subject("not-a-token", TokenKind::Access),
            Err(TokenCodecError::InvalidToken)
        );
    }

    #[test]
    fn foreign_signature_is_an_invalid_token() {
        let codec = TokenCodec::new(jwt_config());
        let mut foreign = jwt_config();
        foreign.signing_key = Secret::from("other-signing-key".to_owned());
        let token = TokenCodec::new(foreign).issue_access(42, &roles()).unwrap();
        assert_eq!(
            codec.parse_subject(&token, TokenKind::Access),
            Err(TokenCodecError::InvalidToken)
        );
    }

    #[test]
    fn expired_claim_is_an_invalid_token() {
        let mut config = jwt_config();
        // far enough in the past to clear the default validation leeway
        config.access_ttl_seconds = -3600;
        let codec = TokenCodec::new(config);
        let token = codec.issue_access(42, &roles()).unwrap();
        assert_eq!(
            codec.parse_subject(&token, TokenKind::Access),
            Err(TokenCodecError::InvalidToken)
        );
    }

    #[test]
    fn expiry_tracks_the_configured_ttl() {
        let codec = TokenCodec::new(jwt_config());
        let token = codec.issue_access(42, &roles()).unwrap();
        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 900);
    }
}
