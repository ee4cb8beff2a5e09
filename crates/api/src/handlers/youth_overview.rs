//! Handlers for the `/youth-overview` roster.
//!
//! Roster columns are free text. JSON numbers and booleans sent by clients
//! are stored in their textual form; `null` clears a column.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use opvang_core::error::CoreError;
use opvang_core::youth_overview::{
    move_changes, validate_changes, FieldChange, MoveExtras, TabLocation,
};
use opvang_db::models::resident::Resident;
use opvang_db::repositories::{ResidentRepo, YouthOverviewRepo};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::response::SuccessMessage;
use crate::state::AppState;

/// Keys that clients echo back from fetched rows; never written.
const READ_ONLY_KEYS: &[&str] = &["badge", "created_at", "updated_at"];

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub tab: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
    pub tab: Option<String>,
    #[serde(flatten)]
    pub extras: MoveExtras,
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn object_changes(object: &Map<String, Value>) -> Result<Vec<FieldChange>, CoreError> {
    validate_changes(
        object
            .iter()
            .filter(|(key, _)| !READ_ONLY_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), text_value(value))),
    )
}

/// `(badge, changes)` for one posted row.
fn row_changes(value: &Value) -> AppResult<(String, Vec<FieldChange>)> {
    let object = value
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Each record must be a JSON object".into()))?;
    let badge = object
        .get("badge")
        .and_then(text_value)
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing required field: badge".into()))?;
    Ok((badge, object_changes(object)?))
}

fn not_found(badge: &str) -> AppError {
    AppError::Core(CoreError::not_found("Youth overview record", badge))
}

/// Roster columns derived from a resident record.
pub fn resident_changes(resident: &Resident) -> Vec<FieldChange> {
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());
    let tab = if resident.date_out.is_some() {
        TabLocation::Out
    } else {
        TabLocation::In
    };

    vec![
        FieldChange { field: "naam", value: Some(resident.last_name.clone()) },
        FieldChange { field: "voornaam", value: Some(resident.first_name.clone()) },
        FieldChange { field: "geboortedatum", value: date(resident.date_of_birth) },
        FieldChange { field: "leeftijd", value: resident.age.map(|a| a.to_string()) },
        FieldChange { field: "datum_in", value: date(resident.date_in) },
        FieldChange { field: "referent", value: resident.reference_person.clone() },
        FieldChange { field: "tab_location", value: Some(tab.as_str().to_string()) },
        FieldChange { field: "datum_transfer", value: date(resident.date_out) },
    ]
}

/// GET /api/youth-overview[?tab=IN|OUT]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let tab = params.tab.as_deref().map(TabLocation::parse).transpose()?;
    let rows = YouthOverviewRepo::list(&state.pool, tab).await?;
    Ok(Json(rows))
}

/// POST /api/youth-overview
///
/// Accepts one record or an array of records; each is upserted on `badge`
/// and only the columns present are written.
pub async fn upsert(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let (rows, message) = match &body {
        Value::Array(items) => (
            items.iter().map(row_changes).collect::<AppResult<Vec<_>>>()?,
            "Records upserted successfully",
        ),
        single => (vec![row_changes(single)?], "Record upserted successfully"),
    };

    let written = YouthOverviewRepo::upsert_many(&state.pool, &rows).await?;
    tracing::info!(written, "Youth overview upserted");
    Ok(Json(SuccessMessage::new(message)))
}

/// GET /api/youth-overview/{badge}
pub async fn get_by_badge(
    State(state): State<AppState>,
    Path(badge): Path<String>,
) -> AppResult<impl IntoResponse> {
    let row = YouthOverviewRepo::find_by_badge(&state.pool, &badge)
        .await?
        .ok_or_else(|| not_found(&badge))?;
    Ok(Json(row))
}

/// PATCH /api/youth-overview/{badge}
///
/// Body is either `{ "field": name, "value": v }` or a partial row.
pub async fn update(
    State(state): State<AppState>,
    Path(badge): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<impl IntoResponse> {
    let object = body
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".into()))?;

    let single = match (object.get("field"), object.get("value")) {
        (Some(Value::String(field)), Some(value)) => Some((field.clone(), text_value(value))),
        _ => None,
    };
    let (changes, message) = match single {
        Some(pair) => (validate_changes([pair])?, "Field updated successfully"),
        None => (object_changes(object)?, "Record updated successfully"),
    };

    if !YouthOverviewRepo::update_fields(&state.pool, &badge, &changes).await? {
        return Err(not_found(&badge));
    }
    tracing::debug!(badge = %badge, fields = changes.len(), "Youth overview updated");
    Ok(Json(SuccessMessage::new(message)))
}

/// DELETE /api/youth-overview/{badge}
pub async fn delete(
    State(state): State<AppState>,
    Path(badge): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !YouthOverviewRepo::delete(&state.pool, &badge).await? {
        return Err(not_found(&badge));
    }
    tracing::info!(badge = %badge, "Youth overview record deleted");
    Ok(Json(SuccessMessage::new("Record deleted successfully")))
}

/// POST /api/youth-overview/{badge}/move
///
/// Moving to OUT without a `datum_transfer` stamps today's date.
pub async fn move_record(
    State(state): State<AppState>,
    Path(badge): Path<String>,
    Json(body): Json<MoveBody>,
) -> AppResult<impl IntoResponse> {
    let tab = body
        .tab
        .as_deref()
        .map(TabLocation::parse)
        .transpose()?
        .ok_or_else(|| AppError::BadRequest(r#"Invalid tab. Must be "IN" or "OUT""#.into()))?;

    let changes = move_changes(tab, body.extras, Utc::now().date_naive());
    if !YouthOverviewRepo::update_fields(&state.pool, &badge, &changes).await? {
        return Err(not_found(&badge));
    }
    tracing::info!(badge = %badge, tab = %tab, "Youth overview record moved");
    Ok(Json(SuccessMessage::new(format!(
        "Record moved to {tab} tab successfully"
    ))))
}

/// POST /api/youth-overview/sync
///
/// One roster row per resident. Columns not derived from the resident keep
/// their hand-edited values.
pub async fn sync_from_residents(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let residents = ResidentRepo::list(&state.pool).await?;
    let rows: Vec<(String, Vec<FieldChange>)> = residents
        .iter()
        .map(|r| (r.badge.to_string(), resident_changes(r)))
        .collect();

    let written = YouthOverviewRepo::upsert_many(&state.pool, &rows).await?;
    tracing::info!(written, "Youth overview synced from residents");
    Ok(Json(SuccessMessage::new(
        "Data synced successfully from residents table",
    )))
}

/// GET /api/youth-overview/age-verification
pub async fn age_verification(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = YouthOverviewRepo::age_verification(&state.pool).await?;
    Ok(Json(rows))
}
