//! Campaign progress
//!
//! Persisted to LocalStorage as the set of completed level indices.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Completed levels and the unlock rule derived from them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(rename = "completedLevels")]
    pub completed: BTreeSet<usize>,
}

impl Progress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "long_cat_progress";

    pub fn new() -> Self {
        Self {
            completed: BTreeSet::new(),
        }
    }

    /// Record a completed level. Returns true the first time.
    pub fn mark_completed(&mut self, level: usize) -> bool {
        self.completed.insert(level)
    }

    pub fn is_completed(&self, level: usize) -> bool {
        self.completed.contains(&level)
    }

    /// Level 0 is always open; every other level needs its predecessor
    pub fn is_level_available(&self, level: usize) -> bool {
        level == 0 || self.is_completed(level - 1)
    }

    /// Highest completed level index
    pub fn last_completed(&self) -> Option<usize> {
        self.completed.last().copied()
    }

    /// First level worth offering: one past the highest completed, capped
    pub fn next_level(&self, level_count: usize) -> usize {
        self.last_completed()
            .map_or(0, |last| last + 1)
            .min(level_count.saturating_sub(1))
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Progress>(&json) {
                    Ok(progress) => {
                        log::info!(
                            "Loaded progress: {} levels completed",
                            progress.completed.len()
                        );
                        return progress;
                    }
                    Err(e) => log::warn!("Discarding unreadable progress: {}", e),
                }
            }
        }

        log::info!("No saved progress, starting fresh");
        Self::new()
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, progress not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to write progress");
                } else {
                    log::info!("Progress saved ({} levels)", self.completed.len());
                }
            }
            Err(e) => log::warn!("Failed to serialize progress: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_rule() {
        let mut progress = Progress::new();
        assert!(progress.is_level_available(0));
        assert!(!progress.is_level_available(1));

        assert!(progress.mark_completed(0));
        assert!(!progress.mark_completed(0));
        assert!(progress.is_level_available(1));
        assert!(!progress.is_level_available(2));

        // Completing out of order unlocks only the follower
        progress.mark_completed(4);
        assert!(progress.is_level_available(5));
        assert!(!progress.is_level_available(3));
    }

    #[test]
    fn test_last_and_next() {
        let mut progress = Progress::new();
        assert_eq!(progress.last_completed(), None);
        assert_eq!(progress.next_level(9), 0);

        progress.mark_completed(0);
        progress.mark_completed(2);
        assert_eq!(progress.last_completed(), Some(2));
        assert_eq!(progress.next_level(9), 3);

        progress.mark_completed(8);
        assert_eq!(progress.next_level(9), 8);
    }

    #[test]
    fn test_json_shape() {
        let mut progress = Progress::new();
        progress.mark_completed(1);
        progress.mark_completed(0);
        let json = serde_json::to_string(&progress).unwrap();
        assert_eq!(json, r#"{"completedLevels":[0,1]}"#);
        let back: Progress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, progress);
    }
}
