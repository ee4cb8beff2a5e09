//! Repository for `invitations`, `allowed_email_domains` and `user_profiles`.

use opvang_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::invitation::{CreateInvitation, Invitation, UserProfile};

/// Column list for invitations queries.
const COLUMNS: &str = "id, token, email, role, is_active, expires_at, used_at, used_by, \
    created_by, created_at, updated_at";

/// Column list for user_profiles queries.
const PROFILE_COLUMNS: &str =
    "id, role, is_approved, invitation_id, approved_by, approved_at, created_at, updated_at";

/// Provides invitation lookups and redemption.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Issue an invitation, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateInvitation) -> Result<Invitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO invitations (token, email, role, expires_at, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(&input.token)
            .bind(&input.email)
            .bind(&input.role)
            .bind(input.expires_at)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find the active invitation for a token/email pair.
    ///
    /// `email` is expected in normalized (lowercase) form.
    pub async fn find_active(
        pool: &PgPool,
        token: &str,
        email: &str,
    ) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invitations
             WHERE token = $1 AND LOWER(email) = $2 AND is_active"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(token)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether `domain` is on the active whitelist.
    pub async fn is_domain_allowed(pool: &PgPool, domain: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM allowed_email_domains WHERE LOWER(domain) = $1 AND is_active
             )",
        )
        .bind(domain)
        .fetch_one(pool)
        .await
    }

    /// Whitelist a domain, reactivating it when it was disabled.
    pub async fn allow_domain(pool: &PgPool, domain: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO allowed_email_domains (domain) VALUES ($1)
             ON CONFLICT ON CONSTRAINT uq_allowed_email_domains_domain
             DO UPDATE SET is_active = TRUE",
        )
        .bind(domain.to_lowercase())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark an invitation used by `user_id` and create the user's approved
    /// profile, atomically.
    ///
    /// Returns `None` when the invitation was redeemed concurrently.
    pub async fn complete(
        pool: &PgPool,
        invitation_id: DbId,
        user_id: Uuid,
        role: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed = sqlx::query(
            "UPDATE invitations SET used_at = NOW(), used_by = $2
             WHERE id = $1 AND used_at IS NULL",
        )
        .bind(invitation_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO user_profiles (id, role, is_approved, invitation_id, approved_at)
             VALUES ($1, $2, TRUE, $3, NOW())
             ON CONFLICT (id) DO UPDATE SET
                role = EXCLUDED.role,
                is_approved = TRUE,
                invitation_id = EXCLUDED.invitation_id,
                approved_at = EXCLUDED.approved_at
             RETURNING {PROFILE_COLUMNS}"
        );
        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(role)
            .bind(invitation_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(profile))
    }
}
