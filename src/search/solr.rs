//! Solr HTTP client / Solr客户端
//!
//! JSON update handler for add/delete/commit, `/select` for queries,
//! `/suggest` for autocomplete, the CoreAdmin API for reloads and Solr Cell
//! (`/update/extract`) for content extraction.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::io::ReaderStream;
use url::Url;

use super::{CoreAdmin, IndexEngine, Suggester};
use crate::config::SolrConfig;
use crate::error::{IndexError, Result};
use crate::extract::{parse_extract_response, Extractor};
use crate::models::{ExtractedDocument, IndexRecord, MetadataEntry};
use crate::storage::BlobReader;
use crate::utils::guess_mime;

pub struct SolrClient {
    http: Client,
    config: SolrConfig,
}

/// Field value that Solr returns as a scalar or a list depending on the schema
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Stored document as written to Solr / Solr文档
#[derive(Debug, Serialize)]
struct SolrDocOut<'a> {
    id: &'a str,
    doc_name: &'a [String],
    doc_content: &'a [String],
    /// JSON text of each single-key mapping
    doc_metadata: Vec<String>,
    path: &'a str,
    doc_data_type: &'a [String],
}

#[derive(Debug, Deserialize)]
struct SolrDocIn {
    id: OneOrMany,
    #[serde(default)]
    doc_name: OneOrMany,
    #[serde(default)]
    doc_content: OneOrMany,
    #[serde(default)]
    doc_metadata: OneOrMany,
    #[serde(default)]
    path: OneOrMany,
    #[serde(default)]
    doc_data_type: OneOrMany,
}

#[derive(Debug, Deserialize)]
struct SelectResponse {
    response: SelectDocs,
}

#[derive(Debug, Deserialize)]
struct SelectDocs {
    #[serde(default)]
    docs: Vec<SolrDocIn>,
}

fn to_solr_doc(record: &IndexRecord) -> Result<SolrDocOut<'_>> {
    let doc_metadata = record
        .doc_metadata
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| IndexError::CommitFailed(format!("cannot encode metadata: {}", e)))?;

    Ok(SolrDocOut {
        id: &record.id,
        doc_name: &record.doc_name,
        doc_content: &record.doc_content,
        doc_metadata,
        path: &record.path,
        doc_data_type: &record.doc_data_type,
    })
}

fn from_solr_doc(doc: SolrDocIn) -> Result<IndexRecord> {
    let id = doc
        .id
        .into_vec()
        .into_iter()
        .next()
        .ok_or_else(|| IndexError::MalformedResponse("document without id".to_string()))?;

    let doc_metadata = doc
        .doc_metadata
        .into_vec()
        .iter()
        .map(|raw| serde_json::from_str::<MetadataEntry>(raw))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| IndexError::MalformedResponse(format!("bad metadata on {}: {}", id, e)))?;

    Ok(IndexRecord {
        doc_name: doc.doc_name.into_vec(),
        doc_content: doc.doc_content.into_vec(),
        doc_metadata,
        path: doc.path.into_vec().into_iter().next().unwrap_or_default(),
        doc_data_type: doc.doc_data_type.into_vec(),
        id,
    })
}

impl SolrClient {
    pub fn new(config: SolrConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SolrConfig {
        &self.config
    }

    fn core_url(&self, handler: &str, params: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}/{}", self.config.core_url(), handler);
        Url::parse_with_params(&raw, params).map_err(|e| IndexError::Engine(format!("invalid url {}: {}", raw, e)))
    }

    async fn post_update(&self, body: Value, op: &str) -> Result<()> {
        let url = self.core_url("update", &[("wt", "json")])?;
        tracing::debug!("Solr {} -> {}", op, url);

        let response = self.http.post(url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IndexError::CommitFailed(format!(
                "{} rejected: HTTP {} {}",
                op,
                status,
                solr_error_message(&text)
            )));
        }
        Ok(())
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        tracing::debug!("Solr GET {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IndexError::Engine(format!("HTTP {} {}", status, solr_error_message(&text))));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| IndexError::MalformedResponse(e.to_string()))
    }
}

/// Pull `error.msg` out of a Solr error body, falling back to the raw text
fn solr_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("msg")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[async_trait]
impl IndexEngine for SolrClient {
    async fn add(&self, record: &IndexRecord) -> Result<()> {
        let doc = to_solr_doc(record)?;
        self.post_update(json!({ "add": { "doc": doc } }), "add").await
    }

    async fn commit(&self) -> Result<()> {
        self.post_update(json!({ "commit": {} }), "commit").await
    }

    async fn query(&self, q: &str) -> Result<Vec<IndexRecord>> {
        let rows = self.config.query_rows.to_string();
        let url = self.core_url("select", &[("q", q), ("rows", rows.as_str()), ("wt", "json")])?;
        let payload = self.get_json(url).await?;

        let parsed: SelectResponse =
            serde_json::from_value(payload).map_err(|e| IndexError::MalformedResponse(e.to_string()))?;
        parsed.response.docs.into_iter().map(from_solr_doc).collect()
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.post_update(json!({ "delete": { "id": id } }), "delete").await
    }
}

#[async_trait]
impl Suggester for SolrClient {
    async fn suggest(&self, dictionary: &str, term: &str) -> Result<Value> {
        let url = self.core_url(
            "suggest",
            &[
                ("suggest", "true"),
                ("suggest.dictionary", dictionary),
                ("suggest.q", term),
                ("wt", "json"),
            ],
        )?;
        self.get_json(url).await
    }
}

#[async_trait]
impl CoreAdmin for SolrClient {
    async fn reload(&self) -> Result<()> {
        let raw = format!("{}/admin/cores", self.config.base());
        let url = Url::parse_with_params(&raw, &[("action", "RELOAD"), ("core", self.config.core.as_str())])
            .map_err(|e| IndexError::Engine(format!("invalid url {}: {}", raw, e)))?;
        self.get_json(url).await?;
        tracing::info!("Reloaded Solr core {}", self.config.core);
        Ok(())
    }
}

#[async_trait]
impl Extractor for SolrClient {
    async fn extract(
        &self,
        reader: BlobReader,
        resource_name: &str,
        correlation_id: &str,
    ) -> Result<ExtractedDocument> {
        let url = self
            .core_url(
                "update/extract",
                &[
                    ("extractOnly", "true"),
                    ("extractFormat", "text"),
                    ("wt", "json"),
                    ("resource.name", resource_name),
                    ("literal.id", correlation_id),
                ],
            )
            .map_err(|e| IndexError::ExtractionFailed(e.to_string()))?;
        tracing::debug!("Solr extract [{}] -> {}", correlation_id, url);

        let body = reqwest::Body::wrap_stream(ReaderStream::new(reader));
        let response = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, guess_mime(resource_name))
            .body(body)
            .send()
            .await
            .map_err(|e| IndexError::ExtractionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IndexError::ExtractionFailed(format!(
                "HTTP {} {}",
                status,
                solr_error_message(&text)
            )));
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| IndexError::ExtractionFailed(e.to_string()))?;
        parse_extract_response(&payload, resource_name)
    }
}
