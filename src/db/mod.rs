//! The article collection, kept in a single SQLite table.
//!
//! Every query matches on exact `title` equality. When several articles share
//! a title, the single-document operations (find, replace, merge, delete)
//! act on the earliest inserted one.

mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use rusqlite::{types::Type, Connection, Row};
use thiserror::Error;
use uuid::Uuid;

use crate::models::*;

/// Errors from a single store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Selects the first article with a given title, in insertion order.
const FIRST_MATCH: &str = "SELECT seq FROM articles WHERE title = ? ORDER BY seq LIMIT 1";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!("Opened article database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Path of the database in the platform data directory.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "wikiDB")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("wiki.db"))
    }

    pub fn open_default() -> anyhow::Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> anyhow::Result<()> {
        let conn = self.conn()?;
        schema::create_schema(&conn)
    }

    /// Close the underlying connection.
    ///
    /// If other handles are still alive the connection stays open until the
    /// last one is dropped.
    pub fn close(self) -> anyhow::Result<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().map_err(|_| StoreError::Poisoned)?;
                conn.close()
                    .map_err(|(_, e)| e)
                    .context("Failed to close database")?;
                tracing::debug!("Article database closed");
            }
            Err(_) => {
                tracing::warn!("Database handle still shared, deferring close to last owner");
            }
        }
        Ok(())
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    // ============================================================
    // Collection operations
    // ============================================================

    pub fn find_all_articles(&self) -> StoreResult<Vec<Article>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, title, content FROM articles ORDER BY seq")?;

        let articles = stmt
            .query_map([], article_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(articles)
    }

    pub fn insert_article(&self, input: ArticleInput) -> StoreResult<Article> {
        let conn = self.conn()?;
        let id = Uuid::new_v4();

        conn.execute(
            "INSERT INTO articles (id, title, content) VALUES (?, ?, ?)",
            (id.to_string(), &input.title, &input.content),
        )?;

        Ok(Article {
            id,
            title: input.title,
            content: input.content,
        })
    }

    /// Remove every article. Returns how many were deleted.
    pub fn delete_all_articles(&self) -> StoreResult<usize> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM articles", [])?;
        tracing::debug!("Deleted {} articles", rows);
        Ok(rows)
    }

    // ============================================================
    // Single article operations
    // ============================================================

    pub fn find_article(&self, title: &str) -> StoreResult<Option<Article>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, content FROM articles WHERE title = ? ORDER BY seq LIMIT 1",
        )?;

        let mut rows = stmt.query([title])?;
        if let Some(row) = rows.next()? {
            Ok(Some(article_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Overwrite both title and content of the first article titled `title`.
    /// A field missing from `input` becomes absent. Returns the number of
    /// articles changed (0 or 1).
    pub fn replace_article(&self, title: &str, input: ArticleInput) -> StoreResult<usize> {
        let conn = self.conn()?;
        let sql =
            format!("UPDATE articles SET title = ?, content = ? WHERE seq = ({FIRST_MATCH})");
        let rows = conn.execute(&sql, (&input.title, &input.content, title))?;
        tracing::debug!("Replaced {} article(s) titled {:?}", rows, title);
        Ok(rows)
    }

    /// Set only the fields present in `patch` on the first article titled
    /// `title`. Returns the number of articles changed (0 or 1).
    pub fn merge_article(&self, title: &str, patch: &ArticlePatch) -> StoreResult<usize> {
        let changes = patch.changes();
        if changes.is_empty() {
            tracing::debug!("Empty patch for {:?}, nothing to merge", title);
            return Ok(0);
        }

        let conn = self.conn()?;
        let mut updates = Vec::with_capacity(changes.len());
        let mut params: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(changes.len() + 1);

        for (field, value) in &changes {
            updates.push(format!("{} = ?", field.as_str()));
            params.push(value);
        }
        params.push(&title);

        let sql = format!(
            "UPDATE articles SET {} WHERE seq = ({FIRST_MATCH})",
            updates.join(", ")
        );
        let rows = conn.execute(&sql, params.as_slice())?;
        tracing::debug!(
            "Merged {} field(s) into {} article(s) titled {:?}",
            changes.len(),
            rows,
            title
        );
        Ok(rows)
    }

    /// Delete the first article titled `title`. Returns the number deleted (0 or 1).
    pub fn delete_article(&self, title: &str) -> StoreResult<usize> {
        let conn = self.conn()?;
        let sql = format!("DELETE FROM articles WHERE seq = ({FIRST_MATCH})");
        let rows = conn.execute(&sql, [title])?;
        tracing::debug!("Deleted {} article(s) titled {:?}", rows, title);
        Ok(rows)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: parse_uuid(0, row.get::<_, String>(0)?)?,
        title: row.get(1)?,
        content: row.get(2)?,
    })
}

fn parse_uuid(column: usize, s: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_corrupt_id() -> Database {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        db.conn()
            .unwrap()
            .execute(
                "INSERT INTO articles (id, title, content) VALUES ('not-a-uuid', 'Bad', 'x')",
                [],
            )
            .unwrap();
        db
    }

    #[test]
    fn corrupt_id_is_a_store_error_on_find() {
        let db = db_with_corrupt_id();

        let err = db.find_article("Bad").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Sqlite(rusqlite::Error::FromSqlConversionFailure(0, Type::Text, _))
        ));
    }

    #[test]
    fn corrupt_id_is_a_store_error_on_list() {
        let db = db_with_corrupt_id();

        assert!(db.find_all_articles().is_err());
    }
}
