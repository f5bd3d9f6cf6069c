use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::session::SessionService;
use crate::websockets::connection_manager::ConnectionManager;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub session_service: Arc<SessionService>,
}

impl AppState {
    pub fn new(
        connection_manager: Arc<dyn ConnectionManager>,
        session_service: Arc<SessionService>,
    ) -> Self {
        Self {
            connection_manager,
            session_service,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Registry error: {0}")]
    RegistryError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::RegistryError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Registry error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
