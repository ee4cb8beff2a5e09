//! Handlers for staff invitations (`/auth/*-invitation`).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use opvang_core::error::CoreError;
use opvang_core::invitation::{check_invitation, email_domain, normalize_email};
use opvang_db::models::invitation::Invitation;
use opvang_db::repositories::InvitationRepo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateInvitationBody {
    pub token: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteInvitationBody {
    pub token: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvitationSummary {
    pub email: String,
    pub role: String,
    pub expires_at: opvang_core::types::Timestamp,
}

#[derive(Debug, Serialize)]
pub struct ValidInvitation {
    pub valid: bool,
    pub invitation: InvitationSummary,
}

#[derive(Debug, Serialize)]
pub struct CompletedInvitation {
    pub success: bool,
    pub role: String,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Look up the active invitation for `(token, email)` and run every check.
async fn usable_invitation(state: &AppState, token: &str, email: &str) -> AppResult<Invitation> {
    let email = normalize_email(email);
    let invitation = InvitationRepo::find_active(&state.pool, token, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Invitation", "for this token")))?;

    let domain = email_domain(&email)
        .ok_or_else(|| AppError::BadRequest("Invalid email address".into()))?;
    let allowed = InvitationRepo::is_domain_allowed(&state.pool, &domain).await?;
    check_invitation(
        invitation.expires_at,
        invitation.used_at,
        Utc::now(),
        &domain,
        allowed,
    )?;
    Ok(invitation)
}

/// POST /api/auth/validate-invitation
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateInvitationBody>,
) -> AppResult<impl IntoResponse> {
    let (Some(token), Some(email)) = (required(body.token), required(body.email)) else {
        return Err(AppError::BadRequest("Token and email are required".into()));
    };

    let invitation = usable_invitation(&state, &token, &email).await?;
    Ok(Json(ValidInvitation {
        valid: true,
        invitation: InvitationSummary {
            email: invitation.email,
            role: invitation.role,
            expires_at: invitation.expires_at,
        },
    }))
}

/// POST /api/auth/complete-invitation
///
/// Redeems the invitation for `userId` and approves their profile with the
/// invited role. A concurrent redemption of the same token loses with 409.
pub async fn complete(
    State(state): State<AppState>,
    Json(body): Json<CompleteInvitationBody>,
) -> AppResult<impl IntoResponse> {
    let (Some(token), Some(email), Some(user_id)) =
        (required(body.token), required(body.email), required(body.user_id))
    else {
        return Err(AppError::BadRequest(
            "Token, email and userId are required".into(),
        ));
    };
    let user_id = Uuid::parse_str(user_id.trim())
        .map_err(|_| AppError::BadRequest("userId must be a UUID".into()))?;

    let invitation = usable_invitation(&state, &token, &email).await?;
    let profile = InvitationRepo::complete(&state.pool, invitation.id, user_id, &invitation.role)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("Invitation has already been used".into()))
        })?;

    tracing::info!(
        invitation_id = invitation.id,
        user_id = %profile.id,
        role = %profile.role,
        "Invitation completed"
    );
    Ok(Json(CompletedInvitation {
        success: true,
        role: profile.role,
    }))
}
