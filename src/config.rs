use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Database
    pub database_url: String,
    pub database_timeout: Duration,
    pub database_run_migrations: bool,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Supabase Auth
    pub supabase_jwt_secret: String,
    /// Reserved; nothing reads it yet.
    pub supabase_anon_key: Option<String>,
}

// Secrets and the connection string stay out of logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("env", &self.env)
            .field("server_addr", &self.server_addr)
            .field("database_timeout", &self.database_timeout)
            .field("database_run_migrations", &self.database_run_migrations)
            .field("cors_allow_origins", &self.cors_allow_origins)
            .field("supabase_anon_key_set", &self.supabase_anon_key.is_some())
            .finish_non_exhaustive()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        // Database
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_timeout = Duration::from_secs(
            env::var("DATABASE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        );
        let database_run_migrations = env::var("DATABASE_RUN_MIGRATIONS")
            .map(|s| parse_flag(&s))
            .unwrap_or(false);

        // CORS
        let cors_allow_origins = parse_origins(
            &env::var("CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        // Supabase Auth
        let supabase_jwt_secret =
            env::var("SUPABASE_JWT_SECRET").context("SUPABASE_JWT_SECRET must be set")?;
        if supabase_jwt_secret.is_empty() {
            anyhow::bail!("SUPABASE_JWT_SECRET must not be empty");
        }
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY").ok().filter(|s| !s.is_empty());

        Ok(Settings {
            env,
            server_addr,
            database_url,
            database_timeout,
            database_run_migrations,
            cors_allow_origins,
            supabase_jwt_secret,
            supabase_anon_key,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
