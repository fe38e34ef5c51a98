pub mod catalog;
pub mod config;
pub mod session;
pub mod store;
pub mod testing;
pub mod tracker;

pub use catalog::{CatalogError, CatalogMovie, MovieCatalog, TmdbCatalog};
pub use config::{
    load_config, load_config_from_str, validate_config, AppwriteConfig, CatalogConfig, Config,
    ConfigError, SanitizedConfig, SqliteConfig, StoreBackend, StoreConfig,
};
pub use session::{SearchOutcome, SearchSession, SearchView};
pub use store::{
    AppwriteCountStore, MemoryCountStore, RecordSeed, SearchCountStore, SearchRecord,
    SqliteCountStore, StoreError, DEFAULT_TRENDING_LIMIT,
};
pub use tracker::CountTracker;
