use std::sync::Arc;

use sqlx::{PgPool, postgres::PgPoolOptions};
use standard_error::{Interpolate, StandardError};

use crate::{conf::Settings, prelude::Result};

/// Shared by every handler; cloning only bumps the pool's refcount.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service_name: Arc<str>,
    pub db_pool: Arc<PgPool>,
}

impl AppState {
    /// Builds the pool without connecting; the first query opens a connection.
    pub fn from_settings(conf: &Settings) -> Result<AppState> {
        let pool = PgPoolOptions::new()
            .max_connections(conf.database_pool_max_connections)
            .connect_lazy(&conf.database_url)
            .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;
        tracing::debug!(
            "pool for {} capped at {} connections",
            &conf.service_name,
            conf.database_pool_max_connections
        );
        Ok(AppState {
            service_name: conf.service_name.as_str().into(),
            db_pool: Arc::new(pool),
        })
    }
}
