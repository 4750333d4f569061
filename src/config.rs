//! Server configuration.
//!
//! Settings come from environment variables and may be overridden on the
//! command line:
//! - `WIKI_HOST` - address to bind (default: `127.0.0.1`)
//! - `WIKI_PORT` - port to bind (default: `3000`)
//! - `WIKI_DATABASE` - SQLite file, or `:memory:` (default: platform data dir)
//! - `WIKI_STATIC_DIR` - directory served for non-API paths (default: `public`
//!   when it exists)

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::db::Database;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "public";
const MEMORY_DATABASE: &str = ":memory:";

/// Where articles are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// The platform data directory, resolved when the store is opened.
    Default,
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" => Self::Default,
            MEMORY_DATABASE => Self::Memory,
            path => Self::File(PathBuf::from(path)),
        }
    }

    /// Open (but do not migrate) the store at this location.
    pub fn open(&self) -> Result<Database> {
        match self {
            Self::Default => Database::open_default(),
            Self::Memory => Database::open_memory(),
            Self::File(path) => Database::open(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseLocation,
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("WIKI_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("WIKI_PORT") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("WIKI_PORT is not a valid port: {value}"))?,
            None => DEFAULT_PORT,
        };

        let database = lookup("WIKI_DATABASE")
            .map(|value| DatabaseLocation::parse(&value))
            .unwrap_or(DatabaseLocation::Default);

        let static_dir = match lookup("WIKI_STATIC_DIR") {
            Some(dir) if dir.trim().is_empty() => None,
            Some(dir) => Some(PathBuf::from(dir)),
            None => {
                let public = PathBuf::from(DEFAULT_STATIC_DIR);
                public.is_dir().then_some(public)
            }
        };

        Ok(Self {
            host,
            port,
            database,
            static_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
