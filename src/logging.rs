use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is unset
fn default_filter(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "profile_backend=debug,tower_http=debug,sqlx=warn,info",
        Environment::Staging => "profile_backend=debug,tower_http=info,sqlx=warn,info",
        Environment::Prod => "profile_backend=info,tower_http=info,sqlx=warn,warn",
    }
}

/// Install the global subscriber: pretty output locally, JSON in production.
pub fn init_logging(env: &Environment) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    let registry = tracing_subscriber::registry().with(filter);

    if matches!(env, Environment::Prod) {
        registry.with(fmt_layer.json().flatten_event(true)).try_init()
    } else {
        registry.with(fmt_layer.pretty()).try_init()
    }
    .context("Failed to install tracing subscriber")?;

    tracing::info!(env = ?env, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_parse() {
        for env in [Environment::Dev, Environment::Staging, Environment::Prod] {
            assert!(EnvFilter::try_new(default_filter(&env)).is_ok());
        }
    }

    #[test]
    fn production_is_quieter_than_dev() {
        assert!(default_filter(&Environment::Prod).ends_with(",warn"));
        assert!(default_filter(&Environment::Dev).contains("profile_backend=debug"));
    }
}
