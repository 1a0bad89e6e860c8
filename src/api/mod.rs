pub mod files;
pub mod server;
pub mod vocabulary;


use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use docindex_backend::IndexError;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: StatusCode, message: &str) -> Self {
        Self {
            code: i32::from(code.as_u16()),
            message: message.to_string(),
            data: None,
        }
    }
}

/// Handler error mapped onto an HTTP status / 接口错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
    Index(IndexError),
}

impl From<IndexError> for ApiError {
    fn from(e: IndexError) -> Self {
        ApiError::Index(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Index(e) => match e {
                IndexError::NotFound(_) => StatusCode::NOT_FOUND,
                IndexError::AmbiguousMatch { .. } => StatusCode::CONFLICT,
                IndexError::ExtractionFailed(_)
                | IndexError::MalformedResponse(_)
                | IndexError::CommitFailed(_)
                | IndexError::Engine(_) => StatusCode::BAD_GATEWAY,
                IndexError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                IndexError::StorageIo(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg.clone(),
            ApiError::Index(e) => e.to_string(),
        };
        if status.is_server_error() {
            tracing::error!("{} {}", status, message);
        } else {
            tracing::debug!("{} {}", status, message);
        }
        (status, Json(ApiResponse::<()>::error(status, &message))).into_response()
    }
}

/// Build the HTTP router / 构建路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(server::health_check))
        .route("/api/File", post(files::upload_files))
        .route("/api/File/Query/:q", get(files::query))
        .route("/api/File/Delete/:id", get(files::delete))
        .route("/api/File/Download/:id", get(files::download))
        .route("/api/File/Suggest/:term", get(files::suggest))
        // Route names kept as published, including the misspelling
        .route("/api/File/AddSynonynms/:synonyms", get(vocabulary::add_synonyms))
        .route("/api/File/AddProtwords/:protwords", get(vocabulary::add_protwords))
        .route("/api/File/AddStopwords/:stopwords", get(vocabulary::add_stopwords))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
