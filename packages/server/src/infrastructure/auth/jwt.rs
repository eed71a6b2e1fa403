//! HS256 JWT token verifier.
//!
//! Tokens are issued by the login flow with a shared secret and carry the
//! identity in a `username` claim. `exp` is optional; when present it is
//! enforced. The bot's identity can never be claimed by a token.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{BOT_USERNAME, TokenError, TokenVerifier, Username};

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Identity the token was issued for.
    pub username: String,
    /// Expiration timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Verifies (and, for the login flow and tests, issues) HS256 tokens.
#[derive(Clone)]
pub struct JwtTokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Create a verifier from the shared secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `username`, optionally expiring at `exp`.
    pub fn issue(&self, username: &str, exp: Option<u64>) -> Result<String, TokenError> {
        let claims = JwtClaims {
            username: username.to_string(),
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    fn decode_identity(&self, token: &str) -> Result<Username, TokenError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        if data.claims.username == BOT_USERNAME {
            return Err(TokenError::ReservedIdentity(data.claims.username));
        }
        Username::new(data.claims.username).map_err(|_| TokenError::MissingIdentity)
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Username, TokenError> {
        self.decode_identity(token)
    }
}
