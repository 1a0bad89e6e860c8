use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use docindex_backend::models::{IndexRecord, UploadResult};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::io::StreamReader;

use super::{ApiError, ApiResponse};
use crate::state::AppState;

/// GET /api/File/Query/:q - 查询索引
pub async fn query(
    State(state): State<Arc<AppState>>,
    Path(q): Path<String>,
) -> Result<Json<Vec<IndexRecord>>, ApiError> {
    let records = state.service.query(&q).await?;
    Ok(Json(records))
}

/// POST /api/File - 上传文件（每个文件独立存储并索引）
///
/// Fields without a file name are skipped. The form field name is the
/// untrusted display name; the file name is the storage key.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<UploadResult>>, ApiError> {
    let mut results = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        let stored_file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let display_name = field.name().unwrap_or("").to_string();

        let stream = Box::pin(field.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)));
        let mut reader = StreamReader::new(stream);

        let result = state
            .service
            .upload(&display_name, &stored_file_name, &mut reader)
            .await;
        tracing::info!("Upload {} -> {:?}", result.stored_file_name, result.status);
        results.push(result);
    }

    Ok(Json(results))
}

/// GET /api/File/Delete/:id - 删除文档及文件
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state.service.delete(&id).await?;
    Ok(Json(ApiResponse::success(id)))
}

/// GET /api/File/Download/:id - 下载文件
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let file = state.service.download(&id).await?;

    let filename = file.file_name().to_string();
    let filename_encoded = urlencoding::encode(&filename);
    let filename_ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() && c != '"' && !c.is_ascii_control() { c } else { '_' })
        .collect();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &file.mime_type)
        .header(header::CONTENT_LENGTH, file.bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", filename_ascii, filename_encoded),
        )
        .body(Body::from(file.bytes))
        .map_err(|e| ApiError::Internal(format!("cannot build download response: {}", e)))
}

/// GET /api/File/Suggest/:term - 自动补全
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Path(term): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let terms = state.service.suggest(&term).await?;
    Ok(Json(terms))
}
