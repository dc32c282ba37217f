// src/config.rs
//
// Runtime configuration loaded from environment variables (and a `.env`
// file when present).

use std::path::PathBuf;

use crate::domain::DEFAULT_PER_PAGE;
use crate::error::{AppError, AppResult};

const APP_DIR: &str = "catalog_admin";

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Root directory of the local media storage
    pub storage_dir: PathBuf,
    /// Maximum pooled SQLite connections
    pub pool_size: u32,
    /// Page size used when a listing does not ask for one
    pub default_per_page: usize,
}

impl CatalogConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                               |
    /// |----------------------------|---------------------------------------|
    /// | `CATALOG_DATABASE_PATH`    | `{data_dir}/catalog_admin/catalog.db` |
    /// | `CATALOG_STORAGE_DIR`      | `{data_dir}/catalog_admin/storage`    |
    /// | `CATALOG_POOL_SIZE`        | `15`                                  |
    /// | `CATALOG_DEFAULT_PER_PAGE` | `15`                                  |
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CatalogConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup("CATALOG_DATABASE_PATH") {
            Some(path) => PathBuf::from(path),
            None => app_data_dir()?.join("catalog.db"),
        };

        let storage_dir = match lookup("CATALOG_STORAGE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => app_data_dir()?.join("storage"),
        };

        let pool_size = parse_or(&lookup, "CATALOG_POOL_SIZE", 15u32)?;
        let default_per_page = parse_or(&lookup, "CATALOG_DEFAULT_PER_PAGE", DEFAULT_PER_PAGE)?;

        Ok(Self {
            database_path,
            storage_dir,
            pool_size,
            default_per_page,
        })
    }
}

fn app_data_dir() -> AppResult<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;
    Ok(data_dir.join(APP_DIR))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Other(format!("{key} must be a positive number, got {raw:?}"))),
        None => Ok(default),
    }
}
