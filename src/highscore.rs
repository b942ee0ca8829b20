//! Best score across runs
//!
//! A single integer persisted as a decimal string under `car_dodger_high`.

use crate::consts::HIGH_SCORE_KEY;
use crate::persistence::KeyValueStore;

/// Best score seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore(pub u64);

impl HighScore {
    /// Load from the store, 0 when absent or not a number
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(HIGH_SCORE_KEY) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(score) => {
                    log::info!("Loaded high score {}", score);
                    Self(score)
                }
                Err(_) => {
                    log::warn!("Ignoring unreadable high score {:?}", raw);
                    Self::default()
                }
            },
            None => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
        }
    }

    /// Check if a final score beats the record
    pub fn beaten_by(&self, score: u64) -> bool {
        score > self.0
    }

    /// Write the record to the store. Failures are logged, never surfaced.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match store.set(HIGH_SCORE_KEY, &self.0.to_string()) {
            Ok(()) => log::info!("High score saved ({})", self.0),
            Err(e) => log::warn!("High score not saved: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_load_defaults_to_zero() {
        assert_eq!(HighScore::load(&MemoryStore::new()), HighScore(0));
    }

    #[test]
    fn test_load_ignores_garbage() {
        let store = MemoryStore::new().with(HIGH_SCORE_KEY, "lots");
        assert_eq!(HighScore::load(&store), HighScore(0));
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        HighScore(173).save(&mut store);
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("173"));
        assert_eq!(HighScore::load(&store), HighScore(173));
    }

    #[test]
    fn test_beaten_by_is_strict() {
        let best = HighScore(50);
        assert!(!best.beaten_by(50));
        assert!(best.beaten_by(51));
    }
}
