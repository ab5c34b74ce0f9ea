//! HS256 verification of Supabase access tokens

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;

use super::{AuthContext, Claims};

/// Audience Supabase stamps on tokens for signed-in users
pub const SUPABASE_AUDIENCE: &str = "authenticated";

const BEARER_PREFIX: &str = "Bearer ";

/// Every way a caller can fail authentication. All of them are a 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or invalid token")]
    MissingToken,

    #[error("Missing or invalid token")]
    InvalidFormat,

    #[error("Token verification failed: {0}")]
    InvalidToken(String),

    #[error("Invalid token payload")]
    MissingSubject,
}

/// Verifies bearer tokens against the project's shared JWT secret.
///
/// Key material is not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[SUPABASE_AUDIENCE]);
        // `set_audience` alone lets a token without `aud` through
        validation.set_required_spec_claims(&["exp", "aud"]);
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Resolve the raw `Authorization` header value to a verified caller
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<AuthContext, AuthError> {
        let header = authorization.ok_or(AuthError::MissingToken)?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthError::InvalidFormat)?
            .trim();

        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = self.verify_token(token)?;
        AuthContext::from_claims(claims)
    }

    /// Check signature, algorithm, expiry and audience, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}
