use chrono::{DateTime, Utc};
use docindex_backend::service::DocumentService;

/// Shared application state / 应用共享状态
pub struct AppState {
    pub service: DocumentService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: DocumentService) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}
