use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Search index record / 索引记录
///
/// Name and content are single-element lists: the schema allows aliases
/// but only one value is ever written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub doc_name: Vec<String>,
    pub doc_content: Vec<String>,
    /// One single-key mapping per extracted field, in extractor order
    pub doc_metadata: Vec<MetadataEntry>,
    pub path: String,
    #[serde(default)]
    pub doc_data_type: Vec<String>,
}

impl IndexRecord {
    /// Recorded MIME type (first value) / 记录的MIME类型
    pub fn mime_type(&self) -> Option<&str> {
        self.doc_data_type.first().map(String::as_str)
    }

    pub fn content(&self) -> Option<&str> {
        self.doc_content.first().map(String::as_str)
    }
}

/// One metadata field, serialized as `{"field": "value"}`.
///
/// Kept as a list of single-key maps instead of one flat map so repeated
/// field names from the extractor survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub field: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl Serialize for MetadataEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetadataEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, String>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(D::Error::custom(format!(
                "metadata entry must have exactly one key, got {}",
                map.len()
            )));
        }
        let (field, value) = map.into_iter().next().ok_or_else(|| D::Error::custom("empty metadata entry"))?;
        Ok(Self { field, value })
    }
}

/// Extractor output: plain text plus ordered (field, value) pairs / 提取结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDocument {
    pub content: String,
    pub metadata: Vec<(String, String)>,
}

impl ExtractedDocument {
    /// First `Content-Type` value without parameters / 内容类型（去掉参数）
    pub fn content_type(&self) -> Option<String> {
        self.metadata
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.split(';').next().unwrap_or("").trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Per-file upload outcome / 单文件上传结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Stored and committed to the index
    Indexed,
    /// Stored, but extraction or indexing failed; the file is not searchable
    IndexFailed,
    StoreFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    /// Caller-supplied name, HTML-escaped / 显示名称（已转义）
    pub file_name: String,
    /// Storage key / 存储文件名
    pub stored_file_name: String,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Downloaded blob held in memory / 下载的文件内容
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub bytes: bytes::Bytes,
    pub mime_type: String,
    pub path: String,
}

impl DownloadedFile {
    /// Last path component / 文件名
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.path)
    }
}

/// Analysis vocabulary lists / 分析词表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyKind {
    Synonyms,
    Protwords,
    Stopwords,
}

impl VocabularyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VocabularyKind::Synonyms => "synonyms",
            VocabularyKind::Protwords => "protwords",
            VocabularyKind::Stopwords => "stopwords",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.as_str())
    }
}

/// Soft outcome of a vocabulary update; never turned into an HTTP error.
#[derive(Debug, Clone, Serialize)]
pub struct VocabularyStatus {
    pub kind: VocabularyKind,
    pub appended: bool,
    pub reload_requested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_entries_keep_duplicates_and_order() {
        let record = IndexRecord {
            id: "1".to_string(),
            doc_name: vec!["a.pdf".to_string()],
            doc_content: vec!["text".to_string()],
            doc_metadata: vec![
                MetadataEntry::new("Author", "A"),
                MetadataEntry::new("Author", "B"),
                MetadataEntry::new("Content-Type", "application/pdf"),
            ],
            path: "uploads/a.pdf".to_string(),
            doc_data_type: vec!["application/pdf".to_string()],
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json["doc_metadata"],
            serde_json::json!([{"Author": "A"}, {"Author": "B"}, {"Content-Type": "application/pdf"}])
        );

        let back: IndexRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_metadata_entry_rejects_multi_key_map() {
        let result: Result<MetadataEntry, _> = serde_json::from_str(r#"{"a":"1","b":"2"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_content_type_strips_parameters() {
        let doc = ExtractedDocument {
            content: String::new(),
            metadata: vec![
                ("stream_size".to_string(), "12".to_string()),
                ("Content-Type".to_string(), "text/plain; charset=UTF-8".to_string()),
            ],
        };
        assert_eq!(doc.content_type().as_deref(), Some("text/plain"));
        assert_eq!(ExtractedDocument::default().content_type(), None);
    }

    #[test]
    fn test_downloaded_file_name() {
        let file = DownloadedFile {
            bytes: bytes::Bytes::new(),
            mime_type: "text/plain".to_string(),
            path: "/srv/uploads/report.txt".to_string(),
        };
        assert_eq!(file.file_name(), "report.txt");
    }
}
