//! Profile persistence
//!
//! Each call is a single statement on a connection of its own:
//! connect, run under the timeout, release.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::db::{Database, StoreError};
use crate::domain::profiles::{Profile, ProfileResponse};

const UPSERT_PROFILE: &str = r#"
    INSERT INTO profiles (id, first_name, last_name, number, password, is_social_login)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (id) DO UPDATE SET
        first_name = EXCLUDED.first_name,
        last_name = EXCLUDED.last_name,
        number = EXCLUDED.number,
        password = EXCLUDED.password,
        is_social_login = EXCLUDED.is_social_login
"#;

const SELECT_PROFILE: &str = r#"
    SELECT first_name, last_name, number, is_social_login
    FROM profiles
    WHERE id = $1
"#;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert the profile, or overwrite every mutable field if the id exists
    async fn save(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Load the profile view for `user_id`
    async fn get(&self, user_id: &str) -> Result<ProfileResponse, StoreError>;

    /// Cheap connectivity probe
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Database row for profile
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    first_name: String,
    last_name: String,
    number: String,
    is_social_login: Option<bool>,
}

impl From<ProfileRow> for ProfileResponse {
    fn from(row: ProfileRow) -> Self {
        Self {
            first_name: row.first_name,
            last_name: row.last_name,
            mobile_number: row.number,
            is_social_login: row.is_social_login.unwrap_or(false),
        }
    }
}

pub struct PgProfileStore {
    db: Database,
}

impl PgProfileStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    async fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut conn = self.db.connect().await?;

        let result = self
            .db
            .bounded(
                sqlx::query(UPSERT_PROFILE)
                    .bind(&profile.id)
                    .bind(&profile.first_name)
                    .bind(&profile.last_name)
                    .bind(&profile.number)
                    .bind(profile.password.as_deref())
                    .bind(profile.is_social_login)
                    .execute(&mut conn),
            )
            .await;

        self.db.release(conn).await;
        result?;

        debug!(is_social_login = profile.is_social_login, "Profile saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, user_id: &str) -> Result<ProfileResponse, StoreError> {
        let mut conn = self.db.connect().await?;

        let result = self
            .db
            .bounded(
                sqlx::query_as::<_, ProfileRow>(SELECT_PROFILE)
                    .bind(user_id)
                    .fetch_optional(&mut conn),
            )
            .await;

        self.db.release(conn).await;

        result?
            .map(ProfileResponse::from)
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.db.connect().await?;
        let result = self
            .db
            .bounded(sqlx::query("SELECT 1").execute(&mut conn))
            .await;
        self.db.release(conn).await;
        result.map(|_| ())
    }
}
