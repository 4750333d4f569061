use anyhow::{Context, Result};
use rusqlite::Connection;

const SCHEMA: &str = include_str!("migrations/001_initial.sql");

/// Create the articles table if it does not exist yet. Safe to run on every start.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Failed to create articles table")?;
    tracing::info!("Article schema ready");
    Ok(())
}
