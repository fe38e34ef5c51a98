use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelrank_core::{
    load_config, validate_config, AppwriteCountStore, CountTracker, MemoryCountStore,
    SanitizedConfig, SearchCountStore, SearchSession, SearchView, SqliteConfig, SqliteCountStore,
    StoreBackend, TmdbCatalog,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("REELRANK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        "Configuration loaded: {}",
        serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default()
    );

    // Create the count store for the configured backend
    let store: Arc<dyn SearchCountStore> = match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory count store (counts are not persisted)");
            Arc::new(MemoryCountStore::new())
        }
        StoreBackend::Sqlite => {
            let sqlite = config.store.sqlite.clone().unwrap_or_else(SqliteConfig::default);
            info!("Using SQLite count store at {:?}", sqlite.path);
            Arc::new(
                SqliteCountStore::new(&sqlite.path).context("Failed to open SQLite count store")?,
            )
        }
        StoreBackend::Appwrite => {
            let appwrite = config
                .store
                .appwrite
                .as_ref()
                .context("store.appwrite section is required when backend = \"appwrite\"")?;
            info!("Using Appwrite count store at {}", appwrite.endpoint);
            Arc::new(
                AppwriteCountStore::new(appwrite)
                    .context("Failed to create Appwrite count store")?,
            )
        }
    };

    // Create catalog client, tracker, and session
    let catalog = Arc::new(
        TmdbCatalog::new(&config.catalog).context("Failed to create catalog client")?,
    );
    let tracker = Arc::new(CountTracker::new(
        store,
        config.catalog.image_base_url.clone(),
    ));
    let session = SearchSession::new(catalog, tracker);

    // An empty term shows the popular listing, like an empty search box.
    let term = std::env::args().nth(1).unwrap_or_default();

    session.load_trending().await;
    session.search(&term).await;

    print_view(&term, &session.view().await);

    Ok(())
}

fn print_view(term: &str, view: &SearchView) {
    if !view.trending.is_empty() {
        println!("Trending searches:");
        for (i, record) in view.trending.iter().enumerate() {
            println!("  {}. {} ({} searches)", i + 1, record.term, record.count);
        }
        println!();
    } else if let Some(message) = &view.trending_error {
        println!("Trending unavailable: {}", message);
        println!();
    }

    if let Some(message) = &view.error_message {
        println!("Search failed: {}", message);
        return;
    }

    if term.is_empty() {
        println!("Popular movies:");
    } else {
        println!("Results for '{}':", term);
    }
    if view.movies.is_empty() {
        println!("  (no results)");
    }
    for movie in &view.movies {
        match movie.year() {
            Some(year) => println!("  {} ({})", movie.title, year),
            None => println!("  {}", movie.title),
        }
    }
}
