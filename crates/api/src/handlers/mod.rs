//! Request handlers.
//!
//! Handlers validate input, call the repositories in `opvang_db` or the
//! workflows in [`crate::documents`], and map errors via
//! [`AppError`](crate::error::AppError).

pub mod administrative_documents;
pub mod config_status;
pub mod document_transfer;
pub mod files;
pub mod invitations;
pub mod residents;
pub mod toewijzingen;
pub mod youth_overview;
