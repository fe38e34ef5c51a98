use super::{types::Config, ConfigError, StoreBackend};

/// Validate configuration
/// Currently validates:
/// - Catalog API token is present
/// - The selected store backend has its section filled in
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.api_token.is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.api_token cannot be empty".to_string(),
        ));
    }

    match config.store.backend {
        StoreBackend::Memory => {}
        StoreBackend::Sqlite => {
            if config.store.sqlite.is_none() {
                return Err(ConfigError::ValidationError(
                    "store.sqlite section is required when backend = \"sqlite\"".to_string(),
                ));
            }
        }
        StoreBackend::Appwrite => {
            let appwrite = config.store.appwrite.as_ref().ok_or_else(|| {
                ConfigError::ValidationError(
                    "store.appwrite section is required when backend = \"appwrite\"".to_string(),
                )
            })?;
            for (name, value) in [
                ("project_id", &appwrite.project_id),
                ("database_id", &appwrite.database_id),
                ("collection_id", &appwrite.collection_id),
                ("api_key", &appwrite.api_key),
            ] {
                if value.is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "store.appwrite.{} cannot be empty",
                        name
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppwriteConfig, CatalogConfig, SqliteConfig, StoreConfig};

    fn base_config() -> Config {
        Config {
            catalog: CatalogConfig {
                api_token: "tok".to_string(),
                ..CatalogConfig::default()
            },
            store: StoreConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_token_fails() {
        let mut config = base_config();
        config.catalog.api_token = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_sqlite_requires_section() {
        let mut config = base_config();
        config.store.backend = StoreBackend::Sqlite;
        assert!(validate_config(&config).is_err());

        config.store.sqlite = Some(SqliteConfig::default());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_appwrite_requires_ids() {
        let mut config = base_config();
        config.store.backend = StoreBackend::Appwrite;
        assert!(validate_config(&config).is_err());

        config.store.appwrite = Some(AppwriteConfig {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: "proj".to_string(),
            database_id: String::new(),
            collection_id: "col".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 30,
        });
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
