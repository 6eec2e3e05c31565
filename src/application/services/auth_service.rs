//! Authentication service for API bearer tokens.

use std::collections::HashSet;

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Validates bearer tokens against a fixed set of HMAC-SHA256 digests.
///
/// Only digests are configured, never raw tokens; verifying a token requires
/// the server-side signing secret. With no digests configured the service is
/// disabled and [`AuthService::authenticate`] accepts every request.
pub struct AuthService {
    signing_secret: String,
    token_hashes: HashSet<String>,
}

impl AuthService {
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key; must match the one used by `admin token create`
    /// - `token_hashes` - lowercase hex digests of accepted tokens
    pub fn new(signing_secret: String, token_hashes: impl IntoIterator<Item = String>) -> Self {
        Self {
            signing_secret,
            token_hashes: token_hashes
                .into_iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// A service that lets every request through.
    pub fn disabled() -> Self {
        Self::new(String::new(), Vec::new())
    }

    pub fn is_enabled(&self) -> bool {
        !self.token_hashes.is_empty()
    }

    /// Hashes a raw token with HMAC-SHA256 using the signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(signing_secret: &str, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if auth is enabled and the token's
    /// digest is not configured.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let token_hash = Self::hash_token(&self.signing_secret, token);
        if self.token_hashes.contains(&token_hash) {
            Ok(())
        } else {
            Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn service_for(tokens: &[&str]) -> AuthService {
        let hashes = tokens
            .iter()
            .map(|t| AuthService::hash_token(&test_secret(), t))
            .collect::<Vec<_>>();
        AuthService::new(test_secret(), hashes)
    }

    #[test]
    fn test_authenticate_success() {
        let service = service_for(&["valid-token"]);
        assert!(service.is_enabled());
        assert!(service.authenticate("valid-token").is_ok());
    }

    #[test]
    fn test_authenticate_invalid_token() {
        let service = service_for(&["valid-token"]);
        let result = service.authenticate("invalid-token");
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_disabled_accepts_everything() {
        let service = AuthService::disabled();
        assert!(!service.is_enabled());
        assert!(service.authenticate("anything").is_ok());
    }

    #[test]
    fn test_configured_hashes_are_case_insensitive() {
        let hash = AuthService::hash_token(&test_secret(), "token").to_uppercase();
        let service = AuthService::new(test_secret(), vec![format!(" {hash} ")]);
        assert!(service.authenticate("token").is_ok());
    }

    #[test]
    fn test_hash_token_consistency() {
        let hash1 = AuthService::hash_token(&test_secret(), "test-token");
        let hash2 = AuthService::hash_token(&test_secret(), "test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, AuthService::hash_token(&test_secret(), "token2"));
    }

    #[test]
    fn test_hash_token_secret_matters() {
        assert_ne!(
            AuthService::hash_token("secret-a", "token"),
            AuthService::hash_token("secret-b", "token")
        );
    }
}
