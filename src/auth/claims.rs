use serde::Deserialize;

/// JWT claims read from Supabase access tokens
///
/// Signature, `exp` and `aud` are enforced by `jsonwebtoken` before this
/// struct is populated, so only the claims the service consumes are kept.
/// `sub` stays optional here so a token without it is reported as a bad
/// payload rather than a decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    #[serde(default)]
    pub sub: Option<String>,

    /// User email - optional
    #[serde(default)]
    pub email: Option<String>,

    /// User role - optional
    #[serde(default)]
    pub role: Option<String>,
}
