use crate::script::Action;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub(super) enum DnsActionResult {
    Completed { message: String, details: String },
    Failed { error: String, details: String },
}

impl DnsActionResult {
    pub fn completed(action: Action, stdout: String) -> Self {
        DnsActionResult::Completed {
            message: format!("DNS {action} completed successfully"),
            details: stdout,
        }
    }

    pub fn failed(action: Action, details: String) -> Self {
        DnsActionResult::Failed {
            error: format!("Failed to {action} DNS record"),
            details,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            DnsActionResult::Completed { .. } => StatusCode::OK,
            DnsActionResult::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DnsActionResult {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
