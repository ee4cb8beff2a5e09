//! Handlers for `/documents/transfer`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use opvang_core::types::DbId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::documents::transfer::{self, TransferMethod, TransferReport, TransferRequest};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody {
    pub resident_id: Option<Value>,
    pub resident_badge: Option<Value>,
    pub resident_name: Option<String>,
    #[serde(default)]
    pub transfer_method: TransferMethod,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStatusParams {
    pub resident_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransferResponse {
    #[serde(flatten)]
    report: TransferReport,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransferFailure {
    success: bool,
    error: String,
    errors: Vec<String>,
    transferred_count: usize,
}

/// Clients send ids and badges either as JSON numbers or as strings.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// POST /api/documents/transfer
///
/// Copy or move a resident's IN documents to the OUT bucket. Returns 500
/// with the per-document errors when nothing could be moved.
pub async fn transfer(
    State(state): State<AppState>,
    Json(body): Json<TransferBody>,
) -> AppResult<impl IntoResponse> {
    let resident_id = body.resident_id.as_ref().and_then(scalar_text);
    let badge = body.resident_badge.as_ref().and_then(scalar_text);
    let name = body.resident_name.filter(|n| !n.trim().is_empty());
    let (Some(resident_id), Some(badge), Some(name)) = (resident_id, badge, name) else {
        return Err(AppError::BadRequest(
            "Missing required fields: residentId, residentBadge, residentName".into(),
        ));
    };
    let resident_id: DbId = resident_id
        .parse()
        .map_err(|_| AppError::BadRequest("residentId must be a number".into()))?;

    let request = TransferRequest {
        resident_id,
        badge,
        name,
        method: body.transfer_method,
    };
    let today = Utc::now().date_naive();
    let report =
        transfer::transfer_documents(&state.pool, state.storage.as_ref(), &request, today).await?;

    if !report.success {
        tracing::error!(
            resident_id,
            errors = report.errors.len(),
            "Document transfer failed"
        );
        let failure = TransferFailure {
            success: false,
            error: "Document transfer failed".into(),
            errors: report.errors,
            transferred_count: report.transferred_count,
        };
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(failure)).into_response());
    }

    let message = format!(
        "Successfully {} {} documents to OUT",
        request.method.past_tense(),
        report.transferred_count
    );
    Ok(Json(TransferResponse { report, message }).into_response())
}

/// GET /api/documents/transfer?residentId=
pub async fn status(
    State(state): State<AppState>,
    Query(params): Query<TransferStatusParams>,
) -> AppResult<impl IntoResponse> {
    let resident_id = params
        .resident_id
        .ok_or_else(|| AppError::BadRequest("Missing residentId parameter".into()))?;
    let status = transfer::transfer_status(&state.pool, resident_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "inDocuments": status.in_documents,
        "outDocuments": status.out_documents,
        "hasTransferred": status.has_transferred,
    })))
}
