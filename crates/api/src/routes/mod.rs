pub mod administrative_documents;
pub mod auth;
pub mod documents;
pub mod files;
pub mod health;
pub mod residents;
pub mod toewijzingen;
pub mod youth_overview;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /config-status                                   storage backend status
///
/// /residents                                       list, create
/// /residents/{id}                                  get, update, delete
///
/// /administrative-documents                        list, create
/// /administrative-documents/upload                 multipart upload
/// /administrative-documents/cleanup-duplicates     report, cleanup
/// /administrative-documents/smart-sync             orphan recovery, sync
/// /administrative-documents/debug-sync             read-only analysis
/// /administrative-documents/organize               move IN files into folders
///
/// /documents/transfer                              status, transfer
///
/// /youth-overview                                  list, upsert
/// /youth-overview/sync                             rebuild from residents
/// /youth-overview/age-verification                 age-test outcomes
/// /youth-overview/{badge}                          get, update, delete
/// /youth-overview/{badge}/move                     move between tabs
///
/// /toewijzingen/staff                              list, upsert
/// /toewijzingen/grid                               list, upsert, clear, delete
///
/// /auth/validate-invitation                        check an invitation
/// /auth/complete-invitation                        redeem an invitation
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/config-status", get(handlers::config_status::config_status))
        .nest("/residents", residents::router())
        .nest("/administrative-documents", administrative_documents::router())
        .nest("/documents", documents::router())
        .nest("/youth-overview", youth_overview::router())
        .nest("/toewijzingen", toewijzingen::router())
        .nest("/auth", auth::router())
}
