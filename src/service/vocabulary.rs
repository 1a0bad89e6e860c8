//! Analysis vocabulary files / 分析词表文件
//!
//! `{instance_dir}/{core}/conf/{synonyms|protwords|stopwords}.txt`,
//! append-only, one entry per line.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::SolrConfig;
use crate::error::{IndexError, Result};
use crate::models::VocabularyKind;

#[derive(Clone)]
pub struct VocabularyStore {
    config: SolrConfig,
    // Serializes appends from this process; each line is still a single write
    lock: Arc<Mutex<()>>,
}

impl VocabularyStore {
    pub fn new(config: SolrConfig) -> Self {
        Self {
            config,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path_for(&self, kind: VocabularyKind) -> PathBuf {
        self.config.vocabulary_path(kind)
    }

    /// Append one line (`entry` + newline) / 追加一行
    pub async fn append(&self, kind: VocabularyKind, entry: &str) -> Result<PathBuf> {
        let path = self.path_for(kind);
        let line = format!("{}\n", entry);
        let lock = self.lock.clone();
        let target = path.clone();

        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let _guard = lock.lock();
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&target)?;
            file.write_all(line.as_bytes())?;
            file.flush()
        })
        .await
        .map_err(|e| IndexError::StorageIo(io::Error::new(io::ErrorKind::Other, e)))??;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path) -> VocabularyStore {
        let config = SolrConfig {
            instance_dir: dir.to_string_lossy().to_string(),
            core: "docs".to_string(),
            ..SolrConfig::default()
        };
        std::fs::create_dir_all(dir.join("docs").join("conf")).unwrap();
        VocabularyStore::new(config)
    }

    #[tokio::test]
    async fn test_append_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let path = store.append(VocabularyKind::Synonyms, "tv, television").await.unwrap();
        store.append(VocabularyKind::Synonyms, "car, automobile").await.unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "tv, television\ncar, automobile\n");
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let entry = format!("word{:02}-{}", i, "x".repeat(200));
                store.append(VocabularyKind::Stopwords, &entry).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let content = std::fs::read_to_string(store.path_for(VocabularyKind::Stopwords)).unwrap();
        let mut lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 32);
        lines.sort();
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(*line, format!("word{:02}-{}", i, "x".repeat(200)));
        }
    }

    #[tokio::test]
    async fn test_missing_conf_dir_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = VocabularyStore::new(SolrConfig {
            instance_dir: dir.path().join("nope").to_string_lossy().to_string(),
            ..SolrConfig::default()
        });
        assert!(matches!(
            store.append(VocabularyKind::Protwords, "keep").await,
            Err(IndexError::StorageIo(_))
        ));
    }
}
