use std::sync::{Arc, Mutex};

use axum::async_trait;
use chrono::SecondsFormat;
use rusqlite::{params, Connection, OptionalExtension};

use crate::model::person::{Person, PersonId};

use super::{PersonStore, StoreError, StoreResult};

const CREATE_PEOPLE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS people (
    id TEXT PRIMARY KEY NOT NULL,
    created_at TEXT NOT NULL,
    document TEXT NOT NULL
);";

/// SQLite-backed store keeping every person as a JSON document keyed by id.
///
/// Statements run on the blocking thread pool, one at a time.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) the database file and makes sure the table exists.
    pub async fn open(path: String) -> StoreResult<Self> {
        let conn = tokio::task::spawn_blocking(move || -> StoreResult<Connection> {
            let conn = Connection::open(&path)?;
            conn.execute_batch(CREATE_PEOPLE_TABLE_SQL)?;

            tracing::info!(%path, "Opened sqlite database");

            Ok(conn)
        })
        .await??;

        Ok(Self::from_connection(conn))
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_PEOPLE_TABLE_SQL)?;

        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_connection<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("sqlite connection poisoned".to_string()))?;

            f(&conn)
        })
        .await?
    }
}

fn to_document(person: &Person) -> StoreResult<String> {
    serde_json::to_string(person).map_err(|err| StoreError::InvalidData(err.to_string()))
}

fn from_document(document: &str) -> StoreResult<Person> {
    serde_json::from_str(document).map_err(|err| StoreError::InvalidData(err.to_string()))
}

#[async_trait]
impl PersonStore for SqliteStore {
    async fn find_all(&self) -> StoreResult<Vec<Person>> {
        self.with_connection(|conn| {
            let mut stmt =
                conn.prepare("SELECT document FROM people ORDER BY created_at ASC, id ASC;")?;
            let documents = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            documents.iter().map(|document| from_document(document)).collect()
        })
        .await
    }

    async fn find_by_id(&self, id: PersonId) -> StoreResult<Option<Person>> {
        self.with_connection(move |conn| {
            let document = conn
                .query_row(
                    "SELECT document FROM people WHERE id = ?1;",
                    [id.to_string()],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;

            document.as_deref().map(from_document).transpose()
        })
        .await
    }

    async fn insert(&self, person: &Person) -> StoreResult<()> {
        let id = person.id.to_string();
        let created_at = person
            .created_at
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        let document = to_document(person)?;

        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO people (id, created_at, document) VALUES (?1, ?2, ?3);",
                params![id, created_at, document],
            )?;

            Ok(())
        })
        .await
    }

    async fn replace(&self, person: &Person) -> StoreResult<bool> {
        let id = person.id.to_string();
        let document = to_document(person)?;

        self.with_connection(move |conn| {
            let changed = conn.execute(
                "UPDATE people SET document = ?2 WHERE id = ?1;",
                params![id, document],
            )?;

            Ok(changed > 0)
        })
        .await
    }

    async fn delete(&self, id: PersonId) -> StoreResult<bool> {
        self.with_connection(move |conn| {
            let changed = conn.execute("DELETE FROM people WHERE id = ?1;", [id.to_string()])?;

            Ok(changed > 0)
        })
        .await
    }
}
