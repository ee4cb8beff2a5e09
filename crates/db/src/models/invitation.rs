//! Staff invitation and user profile models.

use opvang_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `invitations` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invitation {
    pub id: DbId,
    /// Never serialized; the token is the credential.
    #[serde(skip_serializing)]
    pub token: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub used_by: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for issuing an invitation.
#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub token: String,
    pub email: String,
    pub role: String,
    pub expires_at: Timestamp,
    pub created_by: Option<Uuid>,
}

/// A row from the `user_profiles` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub role: String,
    pub is_approved: bool,
    pub invitation_id: Option<DbId>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
