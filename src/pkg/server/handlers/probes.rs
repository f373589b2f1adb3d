use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    pkg::{internal::error::RecordError, server::state::AppState},
    prelude::Result,
};

pub async fn livez(State(state): State<AppState>) -> Json<Value> {
    tracing::debug!("{} is live", &state.service_name);
    Json(json!({ "service": &*state.service_name, "status": "live" }))
}

/// Round-trips `select 1` and reports how busy the pool is.
pub async fn healthz(State(state): State<AppState>) -> Result<Json<Value>> {
    sqlx::query("select 1")
        .execute(&*state.db_pool)
        .await
        .map_err(RecordError::from)?;
    let pool = &*state.db_pool;
    tracing::debug!("{} is healthy", &state.service_name);
    Ok(Json(json!({
        "service": &*state.service_name,
        "status": "healthy",
        "connections": pool.size(),
        "idle": pool.num_idle(),
    })))
}
