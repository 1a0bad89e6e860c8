//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件
//!
//! The loaded `AppConfig` is handed to each component at construction;
//! nothing reads configuration through a global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::VocabularyKind;

/// Env var overriding the config file location / 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "DOCINDEX_CONFIG";

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// Blob storage configuration / 文件存储配置
    #[serde(default)]
    pub storage: StorageConfig,
    /// Solr configuration / Solr配置
    #[serde(default)]
    pub solr: SolrConfig,
    /// Indexing configuration / 索引配置
    #[serde(default)]
    pub index: IndexConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Blob storage configuration / 文件存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory uploaded files are written to / 上传目录
    pub upload_dir: String,
}

/// Solr connection configuration / Solr连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolrConfig {
    /// Base URL, e.g. http://host:8983/solr / 基础地址
    pub base_url: String,
    /// Core name / 核心名称
    pub core: String,
    /// Solr instance directory holding `{core}/conf` / 实例目录
    pub instance_dir: String,
    /// Suggester dictionary name / 建议词典名称
    pub suggester: String,
    /// Per-request HTTP timeout (seconds) / 请求超时
    pub request_timeout_secs: u64,
    /// Maximum rows returned by a query / 查询最大行数
    pub query_rows: u32,
}

/// Indexing configuration / 索引配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Upper bound for extraction + add + commit of one file (seconds)
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8180,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
        }
    }
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8983/solr".to_string(),
            core: "malaydocuments".to_string(),
            instance_dir: "/var/solr/data".to_string(),
            suggester: "FreeTextSuggester".to_string(),
            request_timeout_secs: 60,
            query_rows: 100,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

impl AppConfig {
    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get the upload directory / 获取上传目录
    pub fn get_upload_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.upload_dir)
    }

    pub fn index_timeout(&self) -> Duration {
        Duration::from_secs(self.index.timeout_secs)
    }
}

impl SolrConfig {
    /// Base URL without trailing slash / 去掉末尾斜杠的基础地址
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Core URL, e.g. http://host:8983/solr/core / 核心地址
    pub fn core_url(&self) -> String {
        format!("{}/{}", self.base(), self.core)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `{instance_dir}/{core}/conf/{kind}.txt` / 词表文件路径
    pub fn vocabulary_path(&self, kind: VocabularyKind) -> PathBuf {
        Path::new(&self.instance_dir)
            .join(&self.core)
            .join("conf")
            .join(kind.file_name())
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}
