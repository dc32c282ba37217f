// src/main.rs
//
// Bootstraps the catalog against the configured database and storage, then
// reports what it found.

use std::sync::Arc;

use anyhow::Context;
use log::info;

use catalog_admin::db::{
    create_connection_pool, get_connection, get_database_stats, initialize_database,
    verify_database_integrity,
};
use catalog_admin::domain::video::{VideoAudioMediaReplaced, VideoCreated};
use catalog_admin::{CatalogConfig, CatalogState, InMemoryMessageBroker, LocalStorage};

fn main() -> anyhow::Result<()> {
    // 1. LOGGING & CONFIGURATION
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = CatalogConfig::from_env().context("loading configuration")?;
    info!("Database: {}", config.database_path.display());
    info!("Storage: {}", config.storage_dir.display());

    // 2. INFRASTRUCTURE
    let pool = Arc::new(create_connection_pool(&config).context("opening database")?);
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn).context("initializing schema")?;
        verify_database_integrity(&conn)?;
    }
    let storage = Arc::new(LocalStorage::new(config.storage_dir.clone()).context("opening storage")?);
    let broker = Arc::new(InMemoryMessageBroker::new());

    // 3. REPOSITORIES & SERVICES
    let state = CatalogState::sqlite(
        Arc::clone(&pool),
        storage,
        broker,
        config.default_per_page,
    );

    // 4. EVENT HANDLER REGISTRATION
    state.event_bus.subscribe::<VideoCreated, _>(|event| {
        info!("Video created: {} ({})", event.video_id, event.title);
    });
    state
        .event_bus
        .subscribe::<VideoAudioMediaReplaced, _>(|event| {
            info!(
                "New {} for video {}, waiting for encoder",
                event.field, event.video_id
            );
        });

    // 5. REPORT
    let conn = get_connection(&pool)?;
    let stats = get_database_stats(&conn)?;
    info!(
        "Catalog ready: {} categories, {} genres, {} cast members, {} videos ({} bytes)",
        stats.category_count,
        stats.genre_count,
        stats.cast_member_count,
        stats.video_count,
        stats.size_bytes
    );

    Ok(())
}
