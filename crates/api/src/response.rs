//! Shared response envelope types for API handlers.
//!
//! Lists and single records are returned as bare JSON. Mutations that have
//! nothing else to report use [`SuccessMessage`] instead of ad-hoc
//! `serde_json::json!({ "success": true, ... })`.

use serde::Serialize;

/// `{ "success": true, "message": ... }` acknowledgement.
///
/// # Example
///
/// ```ignore
/// Ok(Json(SuccessMessage::new("Record deleted successfully")))
/// ```
#[derive(Debug, Serialize)]
pub struct SuccessMessage {
    pub success: bool,
    pub message: String,
}

impl SuccessMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// `{ "success": true, "result": T, "message": ... }` for workflow runs.
#[derive(Debug, Serialize)]
pub struct WorkflowResponse<T: Serialize> {
    pub success: bool,
    pub result: T,
    pub message: String,
}

impl<T: Serialize> WorkflowResponse<T> {
    pub fn new(result: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            result,
            message: message.into(),
        }
    }
}
