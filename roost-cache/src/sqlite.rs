//! SQLite-backed entry store.

use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use camino::Utf8Path;
use roost_fs::ensure_parent_dir;
use rusqlite::{Connection, OptionalExtension, params};

use crate::{CacheEntry, CacheError, EntryStore};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS score_cache (
    user_id TEXT NOT NULL,
    location_id TEXT NOT NULL,
    preferences_hash TEXT NOT NULL,
    result TEXT NOT NULL,
    computed_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, location_id)
)";

/// Persistent store keeping one row per `(user_id, location_id)`.
///
/// Results are stored as JSON. Writes use `INSERT OR REPLACE`, so the row
/// is swapped atomically and concurrent writers leave whichever complete
/// entry landed last.
#[derive(Debug)]
pub struct SqliteEntryStore {
    connection: Mutex<Connection>,
}

impl SqliteEntryStore {
    /// Open or create the cache database at `path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the directory, database, or schema cannot
    /// be created.
    pub fn open(path: &Utf8Path) -> Result<Self, CacheError> {
        ensure_parent_dir(path).map_err(|source| CacheError::CreateParent {
            path: path
                .parent()
                .map_or_else(|| Utf8Path::new(".").to_path_buf(), Utf8Path::to_path_buf),
            source,
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| CacheError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection)
    }

    /// Create a store that lives only as long as the process.
    ///
    /// # Errors
    /// Returns [`CacheError`] when the schema cannot be created.
    pub fn in_memory() -> Result<Self, CacheError> {
        let connection = Connection::open_in_memory().map_err(|source| CacheError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, CacheError> {
        connection
            .execute(SCHEMA, [])
            .map_err(|source| CacheError::Query {
                operation: "create cache schema",
                source,
            })?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

impl EntryStore for SqliteEntryStore {
    fn load(&self, user_id: &str, location_id: &str) -> Result<Option<CacheEntry>, CacheError> {
        let connection = self.connection.lock().map_err(|_| CacheError::Poisoned)?;
        let row = connection
            .query_row(
                "SELECT preferences_hash, result, computed_at FROM score_cache
                 WHERE user_id = ?1 AND location_id = ?2",
                params![user_id, location_id],
                |row| {
                    let hash: String = row.get(0)?;
                    let result: String = row.get(1)?;
                    let computed_at: i64 = row.get(2)?;
                    Ok((hash, result, computed_at))
                },
            )
            .optional()
            .map_err(|source| CacheError::Query {
                operation: "load cache entry",
                source,
            })?;
        let Some((preferences_hash, result_json, computed_at)) = row else {
            return Ok(None);
        };
        let result =
            serde_json::from_str(&result_json).map_err(|source| CacheError::Codec {
                location_id: location_id.to_owned(),
                source,
            })?;
        Ok(Some(CacheEntry {
            preferences_hash,
            location_id: location_id.to_owned(),
            result,
            computed_at: from_unix_seconds(computed_at),
        }))
    }

    fn save(&self, user_id: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        let result_json =
            serde_json::to_string(&entry.result).map_err(|source| CacheError::Codec {
                location_id: entry.location_id.clone(),
                source,
            })?;
        let connection = self.connection.lock().map_err(|_| CacheError::Poisoned)?;
        connection
            .execute(
                "INSERT OR REPLACE INTO score_cache
                    (user_id, location_id, preferences_hash, result, computed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user_id,
                    entry.location_id,
                    entry.preferences_hash,
                    result_json,
                    to_unix_seconds(entry.computed_at),
                ],
            )
            .map_err(|source| CacheError::Query {
                operation: "save cache entry",
                source,
            })?;
        Ok(())
    }
}

fn to_unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}

fn from_unix_seconds(seconds: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(u64::try_from(seconds).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use roost_core::{Location, ScoreResult, UserPreferences};
    use roost_scorer::ScoreAggregator;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn result() -> ScoreResult {
        let aggregator = ScoreAggregator::default();
        let mut raw = UserPreferences::default();
        raw.budget.total_monthly_budget = Some(1500.0);
        let preferences = aggregator.normalize(&raw);
        aggregator.score(&preferences, &Location::new("lisbon"))
    }

    #[rstest]
    fn entries_survive_reopening(result: ScoreResult) {
        let temp = TempDir::new().expect("create temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("nested/cache.db")).expect("utf8 path");
        {
            let store = SqliteEntryStore::open(&path).expect("open cache");
            store
                .save("user", &CacheEntry::new("0123456789abcdef", "lisbon", result.clone()))
                .expect("save entry");
        }
        let reopened = SqliteEntryStore::open(&path).expect("reopen cache");
        let entry = reopened
            .load("user", "lisbon")
            .expect("load entry")
            .expect("entry persisted");
        assert_eq!(entry.preferences_hash, "0123456789abcdef");
        assert_eq!(entry.result, result);
    }

    #[rstest]
    fn replacing_keeps_one_row(result: ScoreResult) {
        let store = SqliteEntryStore::in_memory().expect("open in-memory cache");
        store
            .save("user", &CacheEntry::new("old", "lisbon", result.clone()))
            .expect("save old entry");
        store
            .save("user", &CacheEntry::new("new", "lisbon", result))
            .expect("save new entry");
        let entry = store
            .load("user", "lisbon")
            .expect("load entry")
            .expect("entry present");
        assert_eq!(entry.preferences_hash, "new");
    }

    #[rstest]
    fn absent_rows_load_as_none() {
        let store = SqliteEntryStore::in_memory().expect("open in-memory cache");
        assert!(store.load("user", "nowhere").expect("load entry").is_none());
    }
}
