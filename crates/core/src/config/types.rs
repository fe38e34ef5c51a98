use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
///
/// Components receive these sections by value at construction time; nothing
/// reads configuration from ambient globals.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Catalog API client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Bearer token for the catalog API (required).
    pub api_token: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    /// Image base URL for posters/backdrops.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: default_catalog_base_url(),
            image_base_url: default_image_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_catalog_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Search-count store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Store backend type
    #[serde(default)]
    pub backend: StoreBackend,
    /// Appwrite-specific configuration (required when backend = "appwrite")
    #[serde(default)]
    pub appwrite: Option<AppwriteConfig>,
    /// SQLite-specific configuration (required when backend = "sqlite")
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            appwrite: None,
            sqlite: None,
        }
    }
}

/// Available count-store backends
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// In-process map, counts are lost on exit.
    #[default]
    Memory,
    /// Local SQLite database file.
    Sqlite,
    /// Remote Appwrite document collection.
    Appwrite,
}

/// Appwrite document-store backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppwriteConfig {
    /// Appwrite endpoint (default: https://cloud.appwrite.io/v1)
    #[serde(default = "default_appwrite_endpoint")]
    pub endpoint: String,
    /// Appwrite project ID
    pub project_id: String,
    /// Database ID holding the search-count collection
    pub database_id: String,
    /// Collection ID holding one document per search term
    pub collection_id: String,
    /// Appwrite API key
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

/// SQLite count-store backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("reelrank.db")
}

/// Sanitized config for display/logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub catalog: SanitizedCatalogConfig,
    pub store: SanitizedStoreConfig,
}

/// Sanitized catalog config (bearer token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_token_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStoreConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appwrite: Option<SanitizedAppwriteConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqlite: Option<SqliteConfig>,
}

/// Sanitized Appwrite config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                image_base_url: config.catalog.image_base_url.clone(),
                api_token_configured: !config.catalog.api_token.is_empty(),
                timeout_secs: config.catalog.timeout_secs,
            },
            store: SanitizedStoreConfig {
                backend: match config.store.backend {
                    StoreBackend::Memory => "memory".to_string(),
                    StoreBackend::Sqlite => "sqlite".to_string(),
                    StoreBackend::Appwrite => "appwrite".to_string(),
                },
                appwrite: config.store.appwrite.as_ref().map(|a| {
                    SanitizedAppwriteConfig {
                        endpoint: a.endpoint.clone(),
                        project_id: a.project_id.clone(),
                        database_id: a.database_id.clone(),
                        collection_id: a.collection_id.clone(),
                        api_key_configured: !a.api_key.is_empty(),
                        timeout_secs: a.timeout_secs,
                    }
                }),
                sqlite: config.store.sqlite.clone(),
            },
        }
    }
}
