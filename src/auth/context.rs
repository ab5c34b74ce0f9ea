use super::{AuthError, Claims};

/// Authenticated caller, produced by a successful token verification
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Verified `sub` claim; the profile primary key
    pub user_id: String,

    /// User email if available
    pub email: Option<String>,

    /// User role if specified
    pub role: Option<String>,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        let user_id = claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(AuthError::MissingSubject)?;

        Ok(Self {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}
