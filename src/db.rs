//! Scoped PostgreSQL connections
//!
//! Every store call opens its own connection, runs under a bounded timeout
//! and hands the connection back through [`Database::release`]. There is no
//! pool; a connection never outlives the call that opened it.

use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgConnectOptions, PgConnection},
    Connection,
};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile not found")]
    NotFound,

    #[error("database error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

#[derive(Clone)]
pub struct Database {
    options: PgConnectOptions,
    timeout: Duration,
}

impl Database {
    pub fn new(database_url: &str, timeout: Duration) -> Result<Self> {
        let options = PgConnectOptions::from_str(database_url)
            .context("Invalid DATABASE_URL")?
            .application_name("profile-backend");

        Ok(Self { options, timeout })
    }

    /// Open a dedicated connection for one store call
    pub async fn connect(&self) -> Result<PgConnection, StoreError> {
        self.bounded(PgConnection::connect_with(&self.options)).await
    }

    /// Run a single database future under the configured timeout
    pub async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Storage(format!(
                "database operation timed out after {}s",
                self.timeout.as_secs_f32()
            ))),
        }
    }

    /// Close a connection obtained from [`Database::connect`].
    ///
    /// Callers invoke this on both the success and the error path; a close
    /// failure only means the socket is torn down on drop instead.
    pub async fn release(&self, conn: PgConnection) {
        match tokio::time::timeout(self.timeout, conn.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "Connection did not close cleanly"),
            Err(_) => tracing::debug!("Timed out closing connection"),
        }
    }

    /// Apply the embedded schema migrations on a single scoped connection
    pub async fn run_migrations(&self) -> Result<()> {
        let mut conn = self
            .connect()
            .await
            .context("Failed to connect to PostgreSQL")?;

        let result = sqlx::migrate!().run(&mut conn).await;
        self.release(conn).await;
        result.context("Failed to run database migrations")?;

        tracing::info!("Database migrations applied");
        Ok(())
    }
}
