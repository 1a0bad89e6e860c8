use axum::{
    extract::{Path, State},
    Json,
};
use docindex_backend::models::{VocabularyKind, VocabularyStatus};
use std::sync::Arc;

use crate::state::AppState;

// Vocabulary updates are best effort: always 200, outcome in the body.

/// GET /api/File/AddSynonynms/:synonyms - 添加同义词
pub async fn add_synonyms(
    State(state): State<Arc<AppState>>,
    Path(synonyms): Path<String>,
) -> Json<VocabularyStatus> {
    Json(state.service.add_vocabulary(VocabularyKind::Synonyms, &synonyms).await)
}

/// GET /api/File/AddProtwords/:protwords - 添加保护词
pub async fn add_protwords(
    State(state): State<Arc<AppState>>,
    Path(protwords): Path<String>,
) -> Json<VocabularyStatus> {
    Json(state.service.add_vocabulary(VocabularyKind::Protwords, &protwords).await)
}

/// GET /api/File/AddStopwords/:stopwords - 添加停用词
pub async fn add_stopwords(
    State(state): State<Arc<AppState>>,
    Path(stopwords): Path<String>,
) -> Json<VocabularyStatus> {
    Json(state.service.add_vocabulary(VocabularyKind::Stopwords, &stopwords).await)
}
