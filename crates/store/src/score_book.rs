//! Best score and furthest unlocked level, persisted best-effort.

use crate::error::StoreError;
use crate::kv::KeyValueStore;

pub const BEST_SCORE_KEY: &str = "best_score";
pub const MAX_UNLOCKED_LEVEL_KEY: &str = "max_unlocked_level";

/// Progression record backed by any [`KeyValueStore`].
///
/// Values are read once on construction and cached; the cache stays
/// authoritative for the session even when writes fail.
pub struct ScoreBook {
    store: Box<dyn KeyValueStore>,
    best_score: u32,
    /// 1-based level number.
    max_unlocked_level: usize,
}

impl ScoreBook {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let best_score = read_number::<u32>(store.as_ref(), BEST_SCORE_KEY).unwrap_or(0);
        let max_unlocked_level = read_number::<usize>(store.as_ref(), MAX_UNLOCKED_LEVEL_KEY)
            .unwrap_or(1)
            .max(1);
        Self {
            store,
            best_score,
            max_unlocked_level,
        }
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn max_unlocked_level(&self) -> usize {
        self.max_unlocked_level
    }

    /// Raise the best score if `score` beats it. Returns whether it did.
    pub fn record_score(&mut self, score: u32) -> bool {
        if score <= self.best_score {
            return false;
        }
        self.best_score = score;
        self.write(BEST_SCORE_KEY, &score.to_string());
        true
    }

    /// Mark `level_number` (1-based) as reachable. Returns whether the record grew.
    pub fn unlock(&mut self, level_number: usize) -> bool {
        if level_number <= self.max_unlocked_level {
            return false;
        }
        self.max_unlocked_level = level_number;
        self.write(MAX_UNLOCKED_LEVEL_KEY, &level_number.to_string());
        true
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log::warn!("failed to persist {key}: {e}");
        }
    }
}

fn read_number<T: std::str::FromStr>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let result = store.get(key).and_then(|raw| match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StoreError::BadValue {
                key: key.to_string(),
                value,
            }),
    });
    match result {
        Ok(v) => v,
        Err(e) => {
            log::warn!("ignoring stored {key}: {e}");
            None
        }
    }
}
