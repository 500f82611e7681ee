use crate::consts;
use rusqlite::{params, Connection, ErrorCode};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A single row of the leaderboard
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HighScoreEntry {
    pub(crate) name: String,
    pub(crate) score: u32,
}

impl HighScoreEntry {
    pub(crate) fn new<S: Into<String>>(name: S, score: u32) -> HighScoreEntry {
        HighScoreEntry {
            name: name.into(),
            score,
        }
    }
}

/// Persistent storage for high scores.  The table is append-only: every
/// qualifying game adds a row, and nothing is ever updated or deleted.
pub(crate) trait ScoreStore {
    /// Create the storage if it does not already exist
    fn init(&self) -> Result<(), StoreError>;

    /// Return up to `limit` entries, highest score first
    fn top_scores(&self, limit: usize) -> Result<Vec<HighScoreEntry>, StoreError>;

    fn insert(&self, name: &str, score: u32) -> Result<(), StoreError>;

    /// Would `score` earn a place on a leaderboard of `limit` entries?
    fn is_high_score(&self, score: u32, limit: usize) -> Result<bool, StoreError> {
        if score < consts::MIN_HIGH_SCORE {
            return Ok(false);
        }
        Ok(qualifies(score, &self.top_scores(limit)?, limit))
    }

    /// The highest score ever recorded, or 0 if there are none
    fn best_score(&self) -> Result<u32, StoreError> {
        Ok(self
            .top_scores(1)?
            .first()
            .map_or(0, |entry| entry.score))
    }
}

/// Given the current leaderboard `top` (highest first, at most `limit`
/// entries), return whether `score` earns a place on it.  Scores below
/// [`consts::MIN_HIGH_SCORE`] never qualify; ties with the lowest entry of a
/// full board do not qualify.
pub(crate) fn qualifies(score: u32, top: &[HighScoreEntry], limit: usize) -> bool {
    if score < consts::MIN_HIGH_SCORE {
        return false;
    }
    if top.len() < limit {
        return true;
    }
    top.iter().map(|entry| entry.score).min().is_none_or(|lowest| score > lowest)
}

/// A [`ScoreStore`] backed by an SQLite database file.  A fresh connection
/// is opened for each operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub(crate) fn new(path: PathBuf) -> SqliteStore {
        SqliteStore { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })?;
        conn.busy_timeout(consts::DB_BUSY_TIMEOUT)
            .map_err(|source| StoreError::Open {
                path: self.path.clone(),
                source,
            })?;
        Ok(conn)
    }
}

impl ScoreStore for SqliteStore {
    fn init(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(StoreError::Mkdir)?;
        }
        retry_once(|| {
            self.connect()?
                .execute(
                    "CREATE TABLE IF NOT EXISTS scores (name TEXT NOT NULL, score INTEGER NOT NULL)",
                    (),
                )
                .map_err(StoreError::Init)?;
            Ok(())
        })?;
        tracing::debug!(path = %self.path.display(), "High score database ready");
        Ok(())
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<HighScoreEntry>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        retry_once(|| {
            let conn = self.connect()?;
            let mut stmt = conn
                .prepare("SELECT name, score FROM scores ORDER BY score DESC LIMIT ?1")
                .map_err(StoreError::Query)?;
            let rows = stmt
                .query_map(params![limit], |row| {
                    Ok(HighScoreEntry::new(row.get::<_, String>(0)?, row.get(1)?))
                })
                .map_err(StoreError::Query)?;
            rows.collect::<Result<Vec<_>, _>>()
                .map_err(StoreError::Query)
        })
    }

    fn insert(&self, name: &str, score: u32) -> Result<(), StoreError> {
        retry_once(|| {
            self.connect()?
                .execute(
                    "INSERT INTO scores (name, score) VALUES (?1, ?2)",
                    params![name, score],
                )
                .map_err(StoreError::Insert)?;
            Ok(())
        })?;
        tracing::info!(name, score, "Recorded high score");
        Ok(())
    }
}

/// Run `op`, running it a second time if the database was busy or locked
fn retry_once<T, F>(mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Result<T, StoreError>,
{
    match op() {
        Err(e) if e.is_transient() => {
            tracing::warn!(error = %e, "High score database busy; retrying");
            op()
        }
        r => r,
    }
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to create directory for high score database")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to open high score database {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to set up high score table")]
    Init(#[source] rusqlite::Error),
    #[error("failed to read high scores")]
    Query(#[source] rusqlite::Error),
    #[error("failed to save high score")]
    Insert(#[source] rusqlite::Error),
}

impl StoreError {
    /// Did the operation fail only because another connection held a lock?
    fn is_transient(&self) -> bool {
        let source = match self {
            StoreError::Mkdir(_) => return false,
            StoreError::Open { source, .. } => source,
            StoreError::Init(source) | StoreError::Query(source) | StoreError::Insert(source) => {
                source
            }
        };
        matches!(
            source.sqlite_error_code(),
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
        )
    }
}

/// A [`ScoreStore`] kept in memory, optionally failing every operation
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub(crate) entries: std::cell::RefCell<Vec<HighScoreEntry>>,
    pub(crate) broken: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub(crate) fn with_scores(scores: &[(&str, u32)]) -> MemoryStore {
        MemoryStore {
            entries: std::cell::RefCell::new(
                scores
                    .iter()
                    .map(|&(name, score)| HighScoreEntry::new(name, score))
                    .collect(),
            ),
            broken: false,
        }
    }

    pub(crate) fn broken() -> MemoryStore {
        MemoryStore {
            broken: true,
            ..MemoryStore::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.broken {
            Err(StoreError::Query(rusqlite::Error::InvalidQuery))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
impl ScoreStore for MemoryStore {
    fn init(&self) -> Result<(), StoreError> {
        self.check()
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<HighScoreEntry>, StoreError> {
        self.check()?;
        let mut entries = self.entries.borrow().clone();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }

    fn insert(&self, name: &str, score: u32) -> Result<(), StoreError> {
        self.check()?;
        self.entries
            .borrow_mut()
            .push(HighScoreEntry::new(name, score));
        Ok(())
    }
}
