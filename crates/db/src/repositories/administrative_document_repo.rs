//! Repository for the `administrative_documents` table.

use opvang_core::document_kind::DocumentType;
use opvang_core::types::DbId;
use sqlx::PgPool;

use crate::models::administrative_document::{AdministrativeDocument, CreateAdministrativeDocument};

/// Column list for administrative_documents queries.
const COLUMNS: &str = "id, resident_id, document_type, file_name, file_path, file_size, \
    mime_type, description, uploaded_by, resident_badge, resident_name, storage_path, \
    created_at, updated_at";

/// Provides CRUD and sync queries for document records.
pub struct AdministrativeDocumentRepo;

impl AdministrativeDocumentRepo {
    /// Documents of one resident, newest first, optionally of one type.
    pub async fn list_by_resident(
        pool: &PgPool,
        resident_id: DbId,
        document_type: Option<DocumentType>,
    ) -> Result<Vec<AdministrativeDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM administrative_documents
             WHERE resident_id = $1 AND ($2::TEXT IS NULL OR document_type = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, AdministrativeDocument>(&query)
            .bind(resident_id)
            .bind(document_type.map(DocumentType::as_str))
            .fetch_all(pool)
            .await
    }

    /// Every document record, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<AdministrativeDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM administrative_documents ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, AdministrativeDocument>(&query)
            .fetch_all(pool)
            .await
    }

    /// Every document record of one type, oldest first.
    pub async fn list_by_type(
        pool: &PgPool,
        document_type: DocumentType,
    ) -> Result<Vec<AdministrativeDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM administrative_documents
             WHERE document_type = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, AdministrativeDocument>(&query)
            .bind(document_type.as_str())
            .fetch_all(pool)
            .await
    }

    /// Records of one type that lost (or never had) their resident.
    pub async fn list_orphans(
        pool: &PgPool,
        document_type: DocumentType,
    ) -> Result<Vec<AdministrativeDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM administrative_documents
             WHERE document_type = $1 AND resident_id IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, AdministrativeDocument>(&query)
            .bind(document_type.as_str())
            .fetch_all(pool)
            .await
    }

    /// File names already recorded for one type.
    pub async fn file_names_by_type(
        pool: &PgPool,
        document_type: DocumentType,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT file_name FROM administrative_documents WHERE document_type = $1",
        )
        .bind(document_type.as_str())
        .fetch_all(pool)
        .await
    }

    /// Insert a document record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAdministrativeDocument,
    ) -> Result<AdministrativeDocument, sqlx::Error> {
        let query = format!(
            "INSERT INTO administrative_documents (resident_id, document_type, file_name,
                file_path, file_size, mime_type, description, uploaded_by, resident_badge,
                resident_name, storage_path)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdministrativeDocument>(&query)
            .bind(input.resident_id)
            .bind(input.document_type.as_str())
            .bind(&input.file_name)
            .bind(&input.file_path)
            .bind(input.file_size)
            .bind(&input.mime_type)
            .bind(&input.description)
            .bind(&input.uploaded_by)
            .bind(&input.resident_badge)
            .bind(&input.resident_name)
            .bind(&input.storage_path)
            .fetch_one(pool)
            .await
    }

    /// Attach a document to a resident and record who it belongs to.
    pub async fn assign_resident(
        pool: &PgPool,
        id: DbId,
        resident_id: DbId,
        resident_badge: &str,
        resident_name: &str,
    ) -> Result<Option<AdministrativeDocument>, sqlx::Error> {
        let query = format!(
            "UPDATE administrative_documents SET
                resident_id = $2,
                resident_badge = $3,
                resident_name = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdministrativeDocument>(&query)
            .bind(id)
            .bind(resident_id)
            .bind(resident_badge)
            .bind(resident_name)
            .fetch_optional(pool)
            .await
    }

    /// Point a record at a new blob location.
    pub async fn update_location(
        pool: &PgPool,
        id: DbId,
        file_path: &str,
        storage_path: &str,
    ) -> Result<Option<AdministrativeDocument>, sqlx::Error> {
        let query = format!(
            "UPDATE administrative_documents SET
                file_path = $2,
                storage_path = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdministrativeDocument>(&query)
            .bind(id)
            .bind(file_path)
            .bind(storage_path)
            .fetch_optional(pool)
            .await
    }

    /// Delete a document record by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM administrative_documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
