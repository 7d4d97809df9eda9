//! In-memory SQLite store

use super::UserStore;
use crate::error::StoreError;
use crate::validator::{validate, ValidatedUser};
use async_trait::async_trait;
use rusqlite::{ffi, params, Connection};
use std::sync::{Mutex, MutexGuard};
use userdeck_common::RawUserRecord;

/// `seq` preserves insertion order so equal ages come back in the order they
/// were ingested, matching [`super::MemoryUserStore`].
const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id INTEGER NOT NULL UNIQUE,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        number TEXT NOT NULL CHECK (length(number) = 10),
        photo TEXT NOT NULL,
        bio TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_users_age ON users (age, seq);
"#;

pub struct SqliteUserStore {
    db: Mutex<Connection>,
}

impl SqliteUserStore {
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn insert(&self, user: ValidatedUser) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let result = conn.execute(
            "INSERT INTO users (id, name, age, number, photo, bio) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id(),
                user.name(),
                user.age(),
                user.number().as_str(),
                user.photo(),
                user.bio(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(StoreError::Duplicate(user.id()))
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn query_youngest(&self, limit: usize) -> Result<Vec<ValidatedUser>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, age, number, photo, bio FROM users ORDER BY age ASC, seq ASC LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(RawUserRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    age: row.get(2)?,
                    number: row.get(3)?,
                    photo: row.get(4)?,
                    bio: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // Rows cross a storage boundary, so they come back through the validator
        rows.into_iter()
            .map(|raw| {
                let id = raw.id;
                validate(raw).map_err(|e| StoreError::CorruptRow {
                    id,
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
