//! Shared risk state

use chrono::{DateTime, Local};
use risk_eval::RiskLevel;
use std::sync::{Arc, Mutex, PoisonError};

/// The current risk level and when it was set.
///
/// Always read and written as a pair; observers must never see a level
/// paired with a timestamp from a different update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskSnapshot {
    pub level: RiskLevel,
    pub updated_at: DateTime<Local>,
}

/// Handle to the single shared risk value.
///
/// The vision worker is the sole writer; any holder may read. The pair is
/// swapped under one short-held lock, so a snapshot is always internally
/// consistent.
#[derive(Debug, Clone)]
pub struct RiskState {
    inner: Arc<Mutex<RiskSnapshot>>,
}

impl RiskState {
    /// Create state starting at `NONE`
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RiskSnapshot {
                level: RiskLevel::None,
                updated_at: Local::now(),
            })),
        }
    }

    /// Publish a new level stamped with the current wall-clock time
    pub fn publish(&self, level: RiskLevel) {
        self.store(RiskSnapshot {
            level,
            updated_at: Local::now(),
        });
    }

    /// Replace the whole snapshot
    pub fn store(&self, snapshot: RiskSnapshot) {
        *self.lock() = snapshot;
    }

    /// Read a consistent copy of the current snapshot
    pub fn snapshot(&self) -> RiskSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RiskSnapshot> {
        // A writer panic cannot leave the pair half-updated; recover the
        // guard rather than poisoning every later reader.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RiskState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const LEVELS: [RiskLevel; 3] = [RiskLevel::None, RiskLevel::Low, RiskLevel::High];

    #[test]
    fn test_publish_updates_both_fields() {
        let state = RiskState::new();
        let before = state.snapshot();

        state.publish(RiskLevel::High);
        let after = state.snapshot();

        assert_eq!(after.level, RiskLevel::High);
        assert!(after.updated_at >= before.updated_at);
    }

    // Each stored snapshot encodes its level in the timestamp's seconds,
    // so a torn read would surface as a mismatched pair.
    #[test]
    fn test_no_torn_reads_under_concurrent_access() {
        let state = RiskState::new();
        state.store(RiskSnapshot {
            level: LEVELS[0],
            updated_at: Local.timestamp_opt(0, 0).unwrap(),
        });

        let writer_state = state.clone();
        let writer = std::thread::spawn(move || {
            for i in 0i64..5_000 {
                writer_state.store(RiskSnapshot {
                    level: LEVELS[(i % 3) as usize],
                    updated_at: Local.timestamp_opt(i, 0).unwrap(),
                });
            }
        });

        let readers: Vec<_> = (0..2)
            .map(|_| {
                let reader_state = state.clone();
                std::thread::spawn(move || {
                    for _ in 0..5_000 {
                        let snapshot = reader_state.snapshot();
                        let expected = LEVELS[(snapshot.updated_at.timestamp() % 3) as usize];
                        assert_eq!(snapshot.level, expected);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
