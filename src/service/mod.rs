//! Document service - query, upload, delete, download, suggest and
//! vocabulary updates against the index and the blob store / 文档服务
//!
//! Ordering rules:
//! - upload: store blob → index (extract, add, commit) → per-file status;
//!   an unindexed blob is removed only when no record references its path
//! - delete: resolve path → remove blob (failure logged) → engine delete → commit
//! - download: resolve → read blob fully into memory

use std::sync::Arc;
use tokio::io::AsyncRead;

use crate::config::AppConfig;
use crate::error::{IndexError, Result};
use crate::extract::Extractor;
use crate::models::{
    DownloadedFile, IndexRecord, UploadResult, UploadStatus, VocabularyKind, VocabularyStatus,
};
use crate::pipeline::IndexingPipeline;
use crate::search::{parse_suggestions, CoreAdmin, IndexEngine, SolrClient, Suggester};
use crate::storage::{BlobStore, LocalBlobStore};
use crate::utils::{guess_mime, html_escape, id_query, path_query, single_line};

pub mod vocabulary;

pub use vocabulary::VocabularyStore;

/// External collaborators the service talks to / 外部依赖
pub struct Backends {
    pub blobs: Arc<dyn BlobStore>,
    pub extractor: Arc<dyn Extractor>,
    pub engine: Arc<dyn IndexEngine>,
    pub suggester: Arc<dyn Suggester>,
    pub admin: Arc<dyn CoreAdmin>,
}

impl Backends {
    /// Local upload directory + one Solr client for everything else
    pub fn solr(config: &AppConfig) -> Result<Self> {
        let solr = Arc::new(SolrClient::new(config.solr.clone())?);
        Ok(Self {
            blobs: Arc::new(LocalBlobStore::new(config.get_upload_dir())),
            extractor: solr.clone(),
            engine: solr.clone(),
            suggester: solr.clone(),
            admin: solr,
        })
    }
}

pub struct DocumentService {
    blobs: Arc<dyn BlobStore>,
    engine: Arc<dyn IndexEngine>,
    suggester: Arc<dyn Suggester>,
    admin: Arc<dyn CoreAdmin>,
    pipeline: IndexingPipeline,
    vocabulary: VocabularyStore,
    dictionary: String,
}

impl DocumentService {
    pub fn new(config: &AppConfig, backends: Backends) -> Self {
        let pipeline = IndexingPipeline::new(
            backends.blobs.clone(),
            backends.extractor,
            backends.engine.clone(),
            config.index_timeout(),
        );
        Self {
            blobs: backends.blobs,
            engine: backends.engine,
            suggester: backends.suggester,
            admin: backends.admin,
            pipeline,
            vocabulary: VocabularyStore::new(config.solr.clone()),
            dictionary: config.solr.suggester.clone(),
        }
    }

    /// Pass-through query in the engine's syntax / 查询
    pub async fn query(&self, q: &str) -> Result<Vec<IndexRecord>> {
        self.engine.query(q).await
    }

    /// Store one uploaded file and index it / 保存并索引单个文件
    ///
    /// Never fails as a whole: the outcome is reported in the returned
    /// status. A blob whose indexing failed is removed again so no
    /// unreachable file is left behind.
    pub async fn upload(
        &self,
        untrusted_name: &str,
        stored_file_name: &str,
        reader: &mut (dyn AsyncRead + Unpin + Send),
    ) -> UploadResult {
        let mut result = UploadResult {
            file_name: html_escape(untrusted_name),
            stored_file_name: stored_file_name.to_string(),
            status: UploadStatus::StoreFailed,
            id: None,
            error: None,
        };

        let path = match self.blobs.store(stored_file_name, reader).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Failed to store upload {}: {}", stored_file_name, e);
                result.error = Some(e.to_string());
                return result;
            }
        };

        match self.pipeline.index(&path, stored_file_name).await {
            Ok(record) => {
                result.status = UploadStatus::Indexed;
                result.id = Some(record.id);
            }
            Err(e) => {
                tracing::warn!("Stored {} but indexing failed: {}", stored_file_name, e);
                self.discard_unreferenced(&path).await;
                result.status = UploadStatus::IndexFailed;
                result.error = Some(e.to_string());
            }
        }
        result
    }

    /// Remove a blob no committed record points at / 清理无引用文件
    ///
    /// Storage names are last-write-wins, so a failed re-upload may share
    /// its path with an older, still indexed document. That blob stays.
    async fn discard_unreferenced(&self, path: &str) {
        match self.engine.query(&path_query(path)).await {
            Ok(records) if records.is_empty() => {
                if let Err(e) = self.blobs.remove(path).await {
                    tracing::warn!("Failed to remove unindexed blob {}: {}", path, e);
                }
            }
            Ok(records) => {
                tracing::debug!("Keeping blob {}: referenced by {} record(s)", path, records.len());
            }
            Err(e) => {
                tracing::warn!("Keeping blob {}: reference check failed: {}", path, e);
            }
        }
    }

    /// Exactly one record for `id` / 按ID解析唯一记录
    async fn resolve(&self, id: &str) -> Result<IndexRecord> {
        let mut records = self.engine.query(&id_query(id)).await?;
        match records.len() {
            0 => Err(IndexError::NotFound(id.to_string())),
            1 => Ok(records.remove(0)),
            count => Err(IndexError::AmbiguousMatch {
                id: id.to_string(),
                count,
            }),
        }
    }

    /// Delete the record and its blob / 删除记录和文件
    ///
    /// Blob removal failure does not stop the engine delete: a stale file
    /// on disk beats an index record that can never be removed.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let record = self.resolve(id).await?;

        if let Err(e) = self.blobs.remove(&record.path).await {
            tracing::warn!("Failed to remove blob {} for {}: {}", record.path, id, e);
        }

        self.engine.delete(&record.id).await?;
        self.engine.commit().await?;
        tracing::info!("Deleted {} ({})", id, record.path);
        Ok(())
    }

    /// Read the blob behind `id` fully into memory / 下载文件
    pub async fn download(&self, id: &str) -> Result<DownloadedFile> {
        let record = self.resolve(id).await?;
        let bytes = self.blobs.read_all(&record.path).await?;
        let mime_type = record
            .mime_type()
            .map(str::to_string)
            .unwrap_or_else(|| guess_mime(&record.path));

        Ok(DownloadedFile {
            bytes,
            mime_type,
            path: record.path,
        })
    }

    /// Ranked autocomplete terms for `term` / 自动补全
    pub async fn suggest(&self, term: &str) -> Result<Vec<String>> {
        let payload = self.suggester.suggest(&self.dictionary, term).await?;
        parse_suggestions(&payload, &self.dictionary, term)
    }

    /// Append an entry to a vocabulary list and request a core reload.
    ///
    /// Best effort: failures are logged and reported in the status only.
    pub async fn add_vocabulary(&self, kind: VocabularyKind, entry: &str) -> VocabularyStatus {
        let mut status = VocabularyStatus {
            kind,
            appended: false,
            reload_requested: false,
            error: None,
        };

        let line = single_line(entry);
        if line.is_empty() {
            status.error = Some("empty entry".to_string());
            return status;
        }

        match self.vocabulary.append(kind, &line).await {
            Ok(path) => {
                tracing::info!("Appended {} entry to {:?}", kind.as_str(), path);
                status.appended = true;
            }
            Err(e) => {
                tracing::warn!("Failed to append {} entry: {}", kind.as_str(), e);
                status.error = Some(e.to_string());
                return status;
            }
        }

        let admin = self.admin.clone();
        tokio::spawn(async move {
            if let Err(e) = admin.reload().await {
                tracing::warn!("Core reload after {} update failed: {}", kind.as_str(), e);
            }
        });
        status.reload_requested = true;
        status
    }
}
