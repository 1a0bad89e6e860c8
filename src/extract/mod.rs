//! Content extraction / 内容提取
//!
//! The extractor turns an arbitrary document stream into plain text plus
//! ordered metadata pairs. The stream is moved into the call and dropped on
//! every exit path, so a file handle never outlives the round trip.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ExtractedDocument;
use crate::storage::BlobReader;

pub mod solr_cell;

pub use solr_cell::parse_extract_response;

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract text and metadata. Any failure (transport, extractor-side,
    /// unusable payload) surfaces as `IndexError::ExtractionFailed`.
    ///
    /// `resource_name` hints the format to the extractor; `correlation_id`
    /// tags the request for tracing on both sides.
    async fn extract(
        &self,
        reader: BlobReader,
        resource_name: &str,
        correlation_id: &str,
    ) -> Result<ExtractedDocument>;
}
