//! In-memory stand-ins for the engine, extractor, suggester and core admin.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::AsyncReadExt;

use crate::error::{IndexError, Result};
use crate::extract::Extractor;
use crate::models::{ExtractedDocument, IndexRecord};
use crate::search::{CoreAdmin, IndexEngine, Suggester};
use crate::storage::BlobReader;

/// Engine with commit visibility: adds and deletes stay pending until `commit`.
#[derive(Default)]
pub struct FakeEngine {
    visible: Mutex<Vec<IndexRecord>>,
    pending_adds: Mutex<Vec<IndexRecord>>,
    pending_deletes: Mutex<Vec<String>>,
    pub fail_add: AtomicBool,
    pub fail_commit: AtomicBool,
    pub commits: AtomicUsize,
    /// Latency applied to every commit
    pub commit_delay: Mutex<Option<Duration>>,
}

impl FakeEngine {
    /// Insert already-committed records, bypassing add/commit
    pub fn seed(&self, records: Vec<IndexRecord>) {
        self.visible.lock().extend(records);
    }

    pub fn visible(&self) -> Vec<IndexRecord> {
        self.visible.lock().clone()
    }

    pub fn pending_len(&self) -> usize {
        self.pending_adds.lock().len() + self.pending_deletes.lock().len()
    }
}

/// Value of an exact `field:"value"` query
fn parse_field_query(q: &str, field: &str) -> Option<String> {
    let inner = q.strip_prefix(field)?.strip_prefix(":\"")?.strip_suffix('"')?;
    Some(inner.replace("\\\"", "\"").replace("\\\\", "\\"))
}

#[async_trait]
impl IndexEngine for FakeEngine {
    async fn add(&self, record: &IndexRecord) -> Result<()> {
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(IndexError::CommitFailed("add rejected".to_string()));
        }
        self.pending_adds.lock().push(record.clone());
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let delay = *self.commit_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(IndexError::CommitFailed("commit rejected".to_string()));
        }
        let deletes: Vec<String> = self.pending_deletes.lock().drain(..).collect();
        let adds: Vec<IndexRecord> = self.pending_adds.lock().drain(..).collect();
        let mut visible = self.visible.lock();
        visible.retain(|r| !deletes.contains(&r.id));
        visible.extend(adds);
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query(&self, q: &str) -> Result<Vec<IndexRecord>> {
        let visible = self.visible.lock();
        let hits = if let Some(id) = parse_field_query(q, "id") {
            visible.iter().filter(|r| r.id == id).cloned().collect()
        } else if let Some(path) = parse_field_query(q, "path") {
            visible.iter().filter(|r| r.path == path).cloned().collect()
        } else if q == "*:*" {
            visible.clone()
        } else {
            visible
                .iter()
                .filter(|r| r.doc_content.iter().any(|c| c.contains(q)))
                .cloned()
                .collect()
        };
        Ok(hits)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.pending_adds.lock().retain(|r| r.id != id);
        self.pending_deletes.lock().push(id.to_string());
        Ok(())
    }
}

/// Extractor returning the stream's bytes as text, or failing on demand.
#[derive(Default)]
pub struct FakeExtractor {
    pub fail: AtomicBool,
    pub metadata: Vec<(String, String)>,
    pub calls: AtomicUsize,
    /// Latency applied before the stream is read
    pub delay: Option<Duration>,
}

impl FakeExtractor {
    pub fn with_metadata(metadata: Vec<(&str, &str)>) -> Self {
        Self {
            metadata: metadata
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let extractor = Self::default();
        extractor.fail.store(true, Ordering::SeqCst);
        extractor
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    async fn extract(
        &self,
        mut reader: BlobReader,
        _resource_name: &str,
        _correlation_id: &str,
    ) -> Result<ExtractedDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(IndexError::ExtractionFailed("extractor unreachable".to_string()));
        }
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .await
            .map_err(|e| IndexError::ExtractionFailed(e.to_string()))?;
        Ok(ExtractedDocument {
            content: text,
            metadata: self.metadata.clone(),
        })
    }
}

/// Suggester answering with a fixed payload
pub struct FakeSuggester {
    pub payload: Value,
}

#[async_trait]
impl Suggester for FakeSuggester {
    async fn suggest(&self, _dictionary: &str, _term: &str) -> Result<Value> {
        Ok(self.payload.clone())
    }
}

#[derive(Default)]
pub struct FakeAdmin {
    pub fail: AtomicBool,
    pub reloads: AtomicUsize,
}

#[async_trait]
impl CoreAdmin for FakeAdmin {
    async fn reload(&self) -> Result<()> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(IndexError::Engine("core reload refused".to_string()));
        }
        Ok(())
    }
}
