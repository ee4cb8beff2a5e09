//! Repository for the `youth_overview` table.
//!
//! Column names in dynamic statements only ever come from
//! [`FieldChange::field`], which is restricted to the editable whitelist.

use opvang_core::youth_overview::{FieldChange, TabLocation, AGE_VERIFICATION_RESULTS};
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::models::youth_overview::{AgeVerification, YouthOverview, COLUMNS};

/// Provides roster queries and field-level upserts.
pub struct YouthOverviewRepo;

impl YouthOverviewRepo {
    /// List roster rows, optionally for one tab, ordered by badge.
    pub async fn list(
        pool: &PgPool,
        tab: Option<TabLocation>,
    ) -> Result<Vec<YouthOverview>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM youth_overview
             WHERE ($1::TEXT IS NULL OR tab_location = $1)
             ORDER BY badge ASC"
        );
        sqlx::query_as::<_, YouthOverview>(&query)
            .bind(tab.map(TabLocation::as_str))
            .fetch_all(pool)
            .await
    }

    /// Find a roster row by badge.
    pub async fn find_by_badge(
        pool: &PgPool,
        badge: &str,
    ) -> Result<Option<YouthOverview>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM youth_overview WHERE badge = $1");
        sqlx::query_as::<_, YouthOverview>(&query)
            .bind(badge)
            .fetch_optional(pool)
            .await
    }

    /// Insert a row or overwrite only the given fields of an existing one.
    pub async fn upsert<'e, E>(
        executor: E,
        badge: &str,
        changes: &[FieldChange],
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO youth_overview (badge");
        for change in changes {
            qb.push(", ").push(change.field);
        }
        qb.push(") VALUES (").push_bind(badge);
        for change in changes {
            qb.push(", ").push_bind(change.value.clone());
        }
        qb.push(") ON CONFLICT (badge) DO ");
        if changes.is_empty() {
            qb.push("NOTHING");
        } else {
            qb.push("UPDATE SET ");
            let mut set = qb.separated(", ");
            for change in changes {
                set.push(format!("{0} = EXCLUDED.{0}", change.field));
            }
        }

        qb.build().execute(executor).await?;
        Ok(())
    }

    /// Upsert many rows in one transaction. Returns the number of rows written.
    pub async fn upsert_many(
        pool: &PgPool,
        rows: &[(String, Vec<FieldChange>)],
    ) -> Result<usize, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (badge, changes) in rows {
            Self::upsert(&mut *tx, badge, changes).await?;
        }
        tx.commit().await?;
        Ok(rows.len())
    }

    /// Update fields of an existing row. Returns `false` when no row has `badge`.
    pub async fn update_fields(
        pool: &PgPool,
        badge: &str,
        changes: &[FieldChange],
    ) -> Result<bool, sqlx::Error> {
        if changes.is_empty() {
            return Ok(Self::find_by_badge(pool, badge).await?.is_some());
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE youth_overview SET ");
        let mut set = qb.separated(", ");
        for change in changes {
            set.push(change.field)
                .push_unseparated(" = ")
                .push_bind_unseparated(change.value.clone());
        }
        qb.push(" WHERE badge = ").push_bind(badge);

        let result = qb.build().execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a roster row. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, badge: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM youth_overview WHERE badge = $1")
            .bind(badge)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rows with a recorded age-test outcome.
    pub async fn age_verification(pool: &PgPool) -> Result<Vec<AgeVerification>, sqlx::Error> {
        sqlx::query_as::<_, AgeVerification>(
            "SELECT badge, resultaat FROM youth_overview
             WHERE resultaat = ANY($1)
             ORDER BY badge ASC",
        )
        .bind(AGE_VERIFICATION_RESULTS)
        .fetch_all(pool)
        .await
    }
}
