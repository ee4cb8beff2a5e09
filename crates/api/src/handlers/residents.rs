//! Handlers for the `/residents` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opvang_core::error::CoreError;
use opvang_core::resident::{validate_badge, validate_gender, validate_name};
use opvang_core::types::DbId;
use opvang_db::models::resident::{CreateResident, UpdateResident};
use opvang_db::repositories::ResidentRepo;
use serde::Deserialize;

use crate::documents::purge::purge_resident_folders;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteResidentParams {
    #[serde(default)]
    pub purge_documents: bool,
}

/// GET /api/residents
///
/// All residents, ordered by badge.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let residents = ResidentRepo::list(&state.pool).await?;
    Ok(Json(residents))
}

/// POST /api/residents
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateResident>,
) -> AppResult<impl IntoResponse> {
    validate_badge(input.badge)?;
    validate_name("first_name", &input.first_name)?;
    validate_name("last_name", &input.last_name)?;
    if let Some(gender) = &input.gender {
        validate_gender(gender)?;
    }

    let resident = ResidentRepo::create(&state.pool, &input).await?;
    tracing::info!(resident_id = resident.id, badge = resident.badge, "Resident created");
    Ok((StatusCode::CREATED, Json(resident)))
}

/// GET /api/residents/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let resident = ResidentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Resident", id)))?;
    Ok(Json(resident))
}

/// PATCH /api/residents/{id}
///
/// Partial update; absent fields keep their value.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateResident>,
) -> AppResult<impl IntoResponse> {
    if let Some(badge) = input.badge {
        validate_badge(badge)?;
    }
    if let Some(first_name) = &input.first_name {
        validate_name("first_name", first_name)?;
    }
    if let Some(last_name) = &input.last_name {
        validate_name("last_name", last_name)?;
    }
    if let Some(gender) = &input.gender {
        validate_gender(gender)?;
    }

    let resident = ResidentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Resident", id)))?;
    tracing::info!(resident_id = id, "Resident updated");
    Ok(Json(resident))
}

/// DELETE /api/residents/{id}[?purge_documents=true]
///
/// Document records stay behind without a resident. With
/// `purge_documents`, the resident's storage folders are removed too.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DeleteResidentParams>,
) -> AppResult<StatusCode> {
    let resident = ResidentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Resident", id)))?;

    ResidentRepo::delete(&state.pool, id).await?;
    tracing::info!(resident_id = id, badge = resident.badge, "Resident deleted");

    if params.purge_documents {
        let removed = purge_resident_folders(
            state.storage.as_ref(),
            &resident.badge.to_string(),
            &resident.full_name(),
        )
        .await;
        tracing::info!(resident_id = id, removed, "Purged resident folders");
    }

    Ok(StatusCode::NO_CONTENT)
}
