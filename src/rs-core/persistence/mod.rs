use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    models::{HistoryEntry, PlaybackProgress},
    Logger,
};

/// Key under which the preferred quality label is stored, as a plain string.
pub const PREFERRED_QUALITY_KEY: &str = "preferred_quality";

/// Prefix of the keys under which a `PlaybackProgress` is stored, followed by its source URL.
pub const PROGRESS_KEY_PREFIX: &str = "progress_";

/// Key under which the watch history is stored.
pub const HISTORY_KEY: &str = "watch_history";

/// Default amount of time, in milliseconds, during which a `PlaybackProgress` is honored.
pub const DEFAULT_PROGRESS_RETENTION_MS: f64 = 7. * 24. * 60. * 60. * 1000.;

/// Default maximum number of watch history entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Persistent string key-value storage, such as the browser's `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// `KeyValueStore` only living in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Typed access to the viewing state persisted in a `KeyValueStore`:
///   - the preferred quality label
///   - the last position reached in each source URL
///   - the watch history
///
/// Values which cannot be decoded are considered absent.
pub struct PersistenceStore {
    backend: Box<dyn KeyValueStore>,

    /// Amount of time, in milliseconds, after which a `PlaybackProgress` is ignored.
    progress_retention: f64,

    /// Maximum number of watch history entries kept.
    history_limit: usize,
}

impl PersistenceStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            progress_retention: DEFAULT_PROGRESS_RETENTION_MS,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn update_progress_retention(&mut self, retention_ms: f64) {
        self.progress_retention = retention_ms;
    }

    pub fn update_history_limit(&mut self, limit: usize) {
        self.history_limit = limit;
    }

    pub fn preferred_quality(&self) -> Option<String> {
        self.backend
            .get(PREFERRED_QUALITY_KEY)
            .filter(|q| !q.is_empty())
    }

    pub fn set_preferred_quality(&mut self, label: &str) {
        self.backend.set(PREFERRED_QUALITY_KEY, label);
    }

    /// Returns the position, in seconds, at which playback of `url` was last seen, unless that
    /// information is older than the retention window at `now` (a unix timestamp in
    /// milliseconds).
    ///
    /// Stale records are ignored but left in place.
    pub fn progress(&self, url: &str, now: f64) -> Option<f64> {
        let progress: PlaybackProgress = self.read(&progress_key(url))?;
        if now - progress.timestamp > self.progress_retention {
            Logger::debug(&format!("Store: Ignoring stale progress for {url}"));
            return None;
        }
        if !progress.time.is_finite() || progress.time < 0. {
            return None;
        }
        Some(progress.time)
    }

    /// Record that playback of `url` reached `time` seconds at `now`, replacing the previous
    /// record for that URL.
    pub fn save_progress(&mut self, url: &str, time: f64, now: f64) {
        let progress = PlaybackProgress {
            url: url.to_owned(),
            time,
            timestamp: now,
        };
        self.write(&progress_key(url), &progress);
    }

    /// Watch history, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.read(HISTORY_KEY).unwrap_or_default()
    }

    /// Put `entry` at the front of the watch history.
    ///
    /// A previous entry with the same identifier is removed and the oldest entries are evicted
    /// if the history would exceed its limit.
    pub fn push_history(&mut self, entry: HistoryEntry) {
        let mut history = self.history();
        history.retain(|e| e.id != entry.id);
        history.insert(0, entry);
        history.truncate(self.history_limit);
        self.write(HISTORY_KEY, &history);
    }

    pub fn clear_history(&mut self) {
        self.backend.remove(HISTORY_KEY);
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(val) => Some(val),
            Err(err) => {
                Logger::warn(&format!("Store: Malformed value for {key}: {err}"));
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(serialized) => self.backend.set(key, &serialized),
            Err(err) => Logger::error(&format!("Store: Could not serialize {key}: {err}")),
        }
    }
}

fn progress_key(url: &str) -> String {
    format!("{PROGRESS_KEY_PREFIX}{url}")
}
