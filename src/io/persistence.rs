//! Key-value storage for the selected range and its flags.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::Interval;

pub const STATE_KEY: &str = "timelineState";
pub const USER_MOVED_KEY: &str = "timelineUserMoved";
pub const PROCESSED_INITIAL_KEY: &str = "timelineProcessedInitial";

/// String key-value storage, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> crate::Result<()>;
    fn remove(&mut self, key: &str) -> crate::Result<()>;
}

/// Store kept in memory only.
#[derive(Debug, Clone, Default)]
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

    fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> crate::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file starts empty; a malformed
    /// one is ignored with a warning and overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed state file {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.write()
    }

    fn remove(&mut self, key: &str) -> crate::Result<()> {
        if self.entries.remove(key).is_some() {
            self.write()?;
        }
        Ok(())
    }
}

/// On-disk shape of the saved range.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    time_range: [i64; 2],
    timestamp: i64,
}

/// A restorable range and when it was saved (epoch milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSnapshot {
    pub interval: Interval,
    pub timestamp_ms: i64,
}

/// Reads and writes the range snapshot and its flags through a store.
#[derive(Debug)]
pub struct RangePersistence<S: KeyValueStore> {
    store: S,
    freshness: Duration,
}

impl<S: KeyValueStore> RangePersistence<S> {
    pub fn new(store: S, freshness: Duration) -> Self {
        Self { store, freshness }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&mut self, interval: Interval, timestamp_ms: i64) -> crate::Result<()> {
        let state = StoredState {
            time_range: [interval.start_offset_days, interval.end_offset_days],
            timestamp: timestamp_ms,
        };
        self.store.set(STATE_KEY, &serde_json::to_string(&state)?)
    }

    /// The saved snapshot, or `None` when nothing usable is stored.
    pub fn load(&self) -> Option<RangeSnapshot> {
        self.load_at(Utc::now().timestamp_millis())
    }

    /// Same as [`load`](Self::load) with an explicit clock.
    pub fn load_at(&self, now_ms: i64) -> Option<RangeSnapshot> {
        let raw = self.store.get(STATE_KEY)?;
        let state: StoredState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Discarding unreadable {}: {}", STATE_KEY, e);
                return None;
            }
        };
        let age_ms = now_ms.saturating_sub(state.timestamp);
        if age_ms < 0 {
            log::debug!("Discarding {} stamped {} ms in the future", STATE_KEY, -age_ms);
            return None;
        }
        if age_ms > self.freshness.as_millis() as i64 {
            log::debug!("Discarding {} saved {} ms ago", STATE_KEY, age_ms);
            return None;
        }
        let [start, end] = state.time_range;
        Some(RangeSnapshot {
            interval: Interval::new(start, end),
            timestamp_ms: state.timestamp,
        })
    }

    /// Forget the saved range; the flags are kept.
    pub fn clear(&mut self) -> crate::Result<()> {
        self.store.remove(STATE_KEY)
    }

    pub fn user_moved(&self) -> bool {
        self.flag(USER_MOVED_KEY)
    }

    pub fn set_user_moved(&mut self, moved: bool) -> crate::Result<()> {
        self.set_flag(USER_MOVED_KEY, moved)
    }

    pub fn processed_initial(&self) -> bool {
        self.flag(PROCESSED_INITIAL_KEY)
    }

    pub fn set_processed_initial(&mut self, processed: bool) -> crate::Result<()> {
        self.set_flag(PROCESSED_INITIAL_KEY, processed)
    }

    fn flag(&self, key: &str) -> bool {
        self.store.get(key).as_deref() == Some("true")
    }

    fn set_flag(&mut self, key: &str, value: bool) -> crate::Result<()> {
        self.store.set(key, if value { "true" } else { "false" })
    }
}
