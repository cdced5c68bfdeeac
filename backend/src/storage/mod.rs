//! # Document Storage
//!
//! Controls and technicians are kept as JSON documents in a single SQLite
//! table keyed by `(collection, id)`. Every call opens its own connection
//! against the configured file, so the store is cheap to clone into each
//! actix worker.
//!
//! Errors are returned as plain strings; the API layer wraps them into
//! `ServiceError::Storage` together with a user-facing message.

use common::requests::OrderUpdate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CONTROLS: &str = "controls";
pub const TECHNICIANS: &str = "technicians";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (collection, id)
)";

/// Outcome of a batch order update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reorder {
    Applied(usize),
    /// Nothing was written because this control does not exist.
    Missing(String),
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: Arc<PathBuf>,
}

impl DocumentStore {
    /// Opens (or creates) the database file and makes sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, String> {
        let store = Self {
            path: Arc::new(path.as_ref().to_path_buf()),
        };
        store
            .connection()?
            .execute(SCHEMA, [])
            .map_err(|e| e.to_string())?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(&self) -> Result<Connection, String> {
        Connection::open(self.path.as_path()).map_err(|e| e.to_string())
    }

    pub fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, String> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare("SELECT body FROM documents WHERE collection = ?1")
            .map_err(|e| e.to_string())?;
        let bodies = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))
            .map_err(|e| e.to_string())?;

        let mut documents = Vec::new();
        for body in bodies {
            let body = body.map_err(|e| e.to_string())?;
            documents.push(serde_json::from_str(&body).map_err(|e| e.to_string())?);
        }
        Ok(documents)
    }

    pub fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>, String> {
        let conn = self.connection()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| e.to_string())?;
        body.map(|body| serde_json::from_str(&body).map_err(|e| e.to_string()))
            .transpose()
    }

    /// Inserts or replaces the document stored under `id`.
    pub fn put<T: Serialize>(&self, collection: &str, id: &str, document: &T) -> Result<(), String> {
        let body = serde_json::to_string(document).map_err(|e| e.to_string())?;
        self.connection()?
            .execute(
                "INSERT OR REPLACE INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
                params![collection, id, body],
            )
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Returns whether a document was removed.
    pub fn delete(&self, collection: &str, id: &str) -> Result<bool, String> {
        let removed = self
            .connection()?
            .execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .map_err(|e| e.to_string())?;
        Ok(removed > 0)
    }

    /// Writes every new `order` inside one transaction. An unknown id rolls the
    /// whole batch back.
    pub fn reorder_controls(&self, updates: &[OrderUpdate]) -> Result<Reorder, String> {
        let mut conn = self.connection()?;
        let tx = conn.transaction().map_err(|e| e.to_string())?;

        for update in updates {
            let body: Option<String> = tx
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    params![CONTROLS, update.id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| e.to_string())?;
            let Some(body) = body else {
                return Ok(Reorder::Missing(update.id.clone()));
            };

            let mut document: serde_json::Value =
                serde_json::from_str(&body).map_err(|e| e.to_string())?;
            if let Some(fields) = document.as_object_mut() {
                fields.insert("order".to_string(), update.order.into());
            }
            tx.execute(
                "UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2",
                params![CONTROLS, update.id, document.to_string()],
            )
            .map_err(|e| e.to_string())?;
        }

        tx.commit().map_err(|e| e.to_string())?;
        Ok(Reorder::Applied(updates.len()))
    }
}
