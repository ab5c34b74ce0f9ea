//! Profile domain types
//!
//! One profile per authenticated subject, stored in the profiles table.

use serde::{Deserialize, Serialize};

/// Row persisted for a subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub number: String,
    /// `None` for social-login accounts
    pub password: Option<String>,
    pub is_social_login: bool,
}

impl Profile {
    /// Build the row for `user_id` from a save request.
    ///
    /// An absent or empty password marks a social-login account and is
    /// stored as NULL.
    pub fn new(user_id: impl Into<String>, req: SaveProfileRequest) -> Self {
        let password = req.password.filter(|p| !p.is_empty());

        Self {
            id: user_id.into(),
            first_name: req.first_name,
            last_name: req.last_name,
            number: req.mobile_number,
            is_social_login: password.is_none(),
            password,
        }
    }
}

/// Request DTO for POST /api/save-user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response DTO for GET /api/user-profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub is_social_login: bool,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            first_name: p.first_name,
            last_name: p.last_name,
            mobile_number: p.number,
            is_social_login: p.is_social_login,
        }
    }
}
