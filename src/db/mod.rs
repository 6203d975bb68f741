use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::config::{Config, DEFAULT_COUNTRY_CODE};
use crate::error::{ContactsError, ContactsResult};

mod contacts;
mod schema;
mod settings;

pub use schema::SCHEMA_VERSION;
pub use settings::SETTING_READ_CONTACTS;

/// SQLite contact store.
pub struct Database {
    conn: Mutex<Connection>,
    country_code: String,
}

impl Database {
    /// Open the configured database, creating it if needed and running migrations
    pub fn open(config: &Config) -> ContactsResult<Self> {
        let mut db = Self::open_at(config.database_path.clone())?;
        db.country_code = config.country_code.clone();
        Ok(db)
    }

    pub fn open_at(path: PathBuf) -> ContactsResult<Self> {
        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self::with_connection(conn);
        db.migrate()?;
        Ok(db)
    }

    /// Open in-memory database for testing
    pub fn open_memory() -> ContactsResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self::with_connection(conn);
        db.migrate()?;
        Ok(db)
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub(crate) fn conn(&self) -> ContactsResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ContactsError::Other("database connection lock poisoned".into()))
    }

    /// Run `f` inside one transaction: commit on `Ok`, roll back on `Err`.
    ///
    /// The connection lock is not held while `f` runs, so `f` can call the
    /// regular `Database` methods. Statements other threads issue on this
    /// handle meanwhile become part of the transaction.
    pub fn with_transaction<T, F>(&self, f: F) -> ContactsResult<T>
    where
        F: FnOnce(&Self) -> ContactsResult<T>,
    {
        self.conn()?.execute_batch("BEGIN TRANSACTION;")?;

        match f(self) {
            Ok(value) => {
                self.conn()?.execute_batch("COMMIT;")?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.conn().and_then(|c| Ok(c.execute_batch("ROLLBACK;")?)) {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    fn migrate(&self) -> ContactsResult<()> {
        let version = self.get_schema_version()?;

        if version == 0 {
            // Run migration in a transaction for atomicity
            self.conn()?
                .execute_batch(&format!("BEGIN TRANSACTION; {} COMMIT;", schema::SCHEMA_V1))?;
            self.set_schema_version(SCHEMA_VERSION)?;
            tracing::info!(version = SCHEMA_VERSION, "created contact store schema");
        }

        Ok(())
    }

    fn get_schema_version(&self) -> ContactsResult<i32> {
        let conn = self.conn()?;
        let result: Result<i32, _> =
            conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            });

        match result {
            Ok(v) => Ok(v),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(rusqlite::Error::SqliteFailure(err, msg)) => {
                // "no such table" is error code 1 (SQLITE_ERROR)
                if err.code == rusqlite::ErrorCode::Unknown
                    && msg.as_ref().map_or(false, |m| m.contains("no such table"))
                {
                    Ok(0)
                } else {
                    Err(rusqlite::Error::SqliteFailure(err, msg).into())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_schema_version(&self, version: i32) -> ContactsResult<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
            [version],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_exist() {
        let db = Database::open_memory().unwrap();
        let conn = db.conn().unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"contacts".to_string()));
        assert!(tables.contains(&"raw_contacts".to_string()));
        assert!(tables.contains(&"data".to_string()));
        assert!(tables.contains(&"app_settings".to_string()));
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open_memory().unwrap();

        let result: ContactsResult<()> = db.with_transaction(|tx| {
            let contact_id = tx.insert_contact(Some("k1"))?;
            tx.insert_raw_contact(contact_id, None)?;
            Err(ContactsError::Other("phone insert failed".into()))
        });

        assert!(result.is_err());
        assert_eq!(db.count_contacts().unwrap(), 0);
        assert_eq!(db.find_contact_by_lookup_key("k1").unwrap(), None);
    }

    #[test]
    fn test_transaction_commits_on_success() {
        let db = Database::open_memory().unwrap();

        let id = db
            .with_transaction(|tx| tx.insert_contact(Some("k1")))
            .unwrap();

        assert_eq!(db.find_contact_by_lookup_key("k1").unwrap(), Some(id));
        // The connection is usable for a second transaction afterwards
        db.with_transaction(|tx| tx.insert_contact(None)).unwrap();
        assert_eq!(db.count_contacts().unwrap(), 2);
    }

    #[test]
    fn test_open_with_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("nested").join("contacts.db"),
            country_code: "44".into(),
            log_filter: "warn".into(),
        };

        let db = Database::open(&config).unwrap();
        assert_eq!(db.country_code(), "44");
        assert!(config.database_path.exists());
        drop(db);

        // Reopening must not re-run the migration
        let db = Database::open(&config).unwrap();
        assert_eq!(db.get_schema_version().unwrap(), SCHEMA_VERSION);
    }
}
