use sqlx::{PgPool, migrate::Migrator};
use standard_error::{Interpolate, StandardError};

use crate::prelude::Result;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Runs every pending migration inside one transaction.
pub async fn apply(pool: &PgPool) -> Result<()> {
    let db_err = |e: sqlx::Error| StandardError::new("ERR-DB-000").interpolate_err(e.to_string());
    let mut tx = pool.begin().await.map_err(db_err)?;
    MIGRATOR
        .run(&mut *tx)
        .await
        .map_err(|e| StandardError::new("ERR-DB-002").interpolate_err(e.to_string()))?;
    tx.commit().await.map_err(db_err)?;

    tracing::info!("applied {} known migrations", MIGRATOR.iter().count());
    Ok(())
}
