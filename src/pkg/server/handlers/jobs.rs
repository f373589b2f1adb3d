use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use standard_error::{Interpolate, StandardError, Status};
use validator::{Validate, ValidationErrors};

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::spec::{JobFilter, JobPatch, NewJob},
            jobs::JobService,
        },
        server::state::AppState,
    },
    prelude::Result,
};

fn invalid(e: ValidationErrors) -> StandardError {
    StandardError::new("ERR-VALIDATION-001")
        .code(StatusCode::BAD_REQUEST)
        .interpolate_err(e.to_string())
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewJob>,
) -> Result<(StatusCode, Json<Value>)> {
    input.validate().map_err(invalid)?;
    let job = JobService::new(&state.db_pool).create(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<Value>> {
    let jobs = JobService::new(&state.db_pool).list(&filter).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Value>> {
    let job = JobService::new(&state.db_pool).get(id).await?;
    Ok(Json(json!({ "job": job })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<Value>> {
    patch.validate().map_err(invalid)?;
    let job = JobService::new(&state.db_pool).update(id, patch).await?;
    Ok(Json(json!({ "job": job })))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Value>> {
    JobService::new(&state.db_pool).remove(id).await?;
    Ok(Json(json!({ "deleted": id.to_string() })))
}
