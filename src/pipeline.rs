//! Indexing pipeline / 索引流水线
//!
//! Stored blob → extraction → index record → add + commit. The record is
//! visible to queries before `index` returns.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{IndexError, Result};
use crate::extract::Extractor;
use crate::models::{ExtractedDocument, IndexRecord, MetadataEntry};
use crate::search::IndexEngine;
use crate::storage::BlobStore;
use crate::utils::guess_mime;

pub struct IndexingPipeline {
    blobs: Arc<dyn BlobStore>,
    extractor: Arc<dyn Extractor>,
    engine: Arc<dyn IndexEngine>,
    timeout: Duration,
}

impl IndexingPipeline {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        extractor: Arc<dyn Extractor>,
        engine: Arc<dyn IndexEngine>,
        timeout: Duration,
    ) -> Self {
        Self {
            blobs,
            extractor,
            engine,
            timeout,
        }
    }

    /// Index the blob at `path` under `doc_name` / 索引文件
    ///
    /// Nothing is sent to the engine unless extraction succeeded. The
    /// timeout bounds opening and extraction only: once `add` is issued,
    /// add and commit run to completion, and a failed commit withdraws the
    /// pending add.
    pub async fn index(&self, path: &str, doc_name: &str) -> Result<IndexRecord> {
        let correlation_id = Uuid::new_v4().to_string();

        let extraction = self.extract(path, doc_name, &correlation_id);
        let extracted = match tokio::time::timeout(self.timeout, extraction).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::error!("Extracting {} [{}] timed out after {:?}", path, correlation_id, self.timeout);
                return Err(IndexError::Timeout(self.timeout.as_secs()));
            }
        };

        let record = build_record(path, doc_name, extracted);

        self.engine.add(&record).await?;
        if let Err(e) = self.engine.commit().await {
            if let Err(undo) = self.engine.delete(&record.id).await {
                tracing::warn!("Failed to withdraw uncommitted record {}: {}", record.id, undo);
            }
            return Err(e);
        }

        tracing::info!("Indexed {} as {} ({} metadata fields)", path, record.id, record.doc_metadata.len());
        Ok(record)
    }

    async fn extract(&self, path: &str, doc_name: &str, correlation_id: &str) -> Result<ExtractedDocument> {
        // The reader is moved into the extractor and dropped there on every path
        let reader = self.blobs.open(path).await?;
        self.extractor
            .extract(reader, doc_name, correlation_id)
            .await
            .map_err(|e| match e {
                IndexError::ExtractionFailed(_) => e,
                other => IndexError::ExtractionFailed(other.to_string()),
            })
    }
}

/// Assemble a fresh record from extractor output / 构建索引记录
pub fn build_record(path: &str, doc_name: &str, extracted: ExtractedDocument) -> IndexRecord {
    let mime = extracted.content_type().unwrap_or_else(|| guess_mime(doc_name));
    let doc_metadata = extracted
        .metadata
        .into_iter()
        .map(|(field, value)| MetadataEntry::new(field, value))
        .collect();

    IndexRecord {
        id: Uuid::new_v4().to_string(),
        doc_name: vec![doc_name.to_string()],
        doc_content: vec![extracted.content],
        doc_metadata,
        path: path.to_string(),
        doc_data_type: vec![mime],
    }
}
