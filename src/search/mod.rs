//! Search module - capability interfaces to the search engine / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - Only primitive operations are exposed: add, commit, query, delete, suggest, reload
//! - The pipeline and the document service control ordering and error policy
//! - Call direction: service → search (unidirectional) / 调用方向
//!
//! `SolrClient` implements every interface here plus `Extractor`; tests
//! substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::IndexRecord;

pub mod solr;
pub mod suggest;

pub use solr::SolrClient;
pub use suggest::parse_suggestions;

/// Index operations / 索引操作
#[async_trait]
pub trait IndexEngine: Send + Sync {
    /// Submit a record; invisible to queries until `commit` / 添加记录
    async fn add(&self, record: &IndexRecord) -> Result<()>;

    /// Make prior adds and deletes visible / 提交
    async fn commit(&self) -> Result<()>;

    /// Run a query in the engine's own syntax, ranking order preserved / 查询
    async fn query(&self, q: &str) -> Result<Vec<IndexRecord>>;

    /// Delete by id; invisible until `commit` / 删除记录
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Autocomplete lookups / 自动补全
#[async_trait]
pub trait Suggester: Send + Sync {
    /// Raw nested payload for `term` from `dictionary` / 原始建议响应
    async fn suggest(&self, dictionary: &str, term: &str) -> Result<serde_json::Value>;
}

/// Core administration / 核心管理
#[async_trait]
pub trait CoreAdmin: Send + Sync {
    /// Reload the core so analysis config changes take effect / 重新加载核心
    async fn reload(&self) -> Result<()>;
}
