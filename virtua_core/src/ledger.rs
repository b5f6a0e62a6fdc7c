//! Progress ledger: typed access to all persisted fitness state.
//!
//! Every read and write of the key-value store goes through this type, so
//! key names and wire formats live in exactly one place. Reads that fail
//! (missing key, unreadable store, malformed value) degrade to defaults with
//! a logged warning; they are never fatal.

use crate::stats;
use crate::store::{keys, KvStore};
use crate::{QuotaBook, Result, WeightEntry};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Flat calorie credit per completed workout; intensity is not modeled.
const CALORIES_PER_WORKOUT: u64 = 100;

/// Cumulative all-time totals, as shown on the statistics surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub points: u64,
    pub workouts_done: u64,
    pub total_minutes: u64,
    pub calories_lost: u64,
}

/// What a completed session earned, for user-facing confirmation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionSummary {
    pub points_earned: u64,
    pub total_points: u64,
    pub current_streak: u32,
    pub personal_best_streak: u32,
}

/// Typed facade over a [`KvStore`].
///
/// Injected into the session controller and into each CLI command; nothing
/// else touches the store directly.
pub struct ProgressLedger<S: KvStore> {
    store: S,
}

impl<S: KvStore> ProgressLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Counters
    // ------------------------------------------------------------------

    fn read_u64(&self, key: &str) -> u64 {
        let raw = match self.store.get(key) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}. Defaulting to 0.", key, e);
                return 0;
            }
        };
        match raw {
            None => 0,
            Some(text) => text.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Malformed value for {}: {:?}. Defaulting to 0.", key, text);
                0
            }),
        }
    }

    fn write_u64(&mut self, key: &str, value: u64) -> Result<()> {
        self.store.set(key, &value.to_string())
    }

    pub fn points(&self) -> u64 {
        self.read_u64(keys::POINTS)
    }

    pub fn workouts_done(&self) -> u64 {
        self.read_u64(keys::WORKOUTS_DONE)
    }

    pub fn total_minutes(&self) -> u64 {
        self.read_u64(keys::TOTAL_MINUTES)
    }

    pub fn calories_lost(&self) -> u64 {
        self.read_u64(keys::CALORIES_LOST)
    }

    pub fn current_streak(&self) -> u32 {
        self.read_u64(keys::CURRENT_STREAK) as u32
    }

    pub fn personal_best_streak(&self) -> u32 {
        self.read_u64(keys::BEST_STREAK) as u32
    }

    pub fn totals(&self) -> Totals {
        Totals {
            points: self.points(),
            workouts_done: self.workouts_done(),
            total_minutes: self.total_minutes(),
            calories_lost: self.calories_lost(),
        }
    }

    // ------------------------------------------------------------------
    // Quota
    // ------------------------------------------------------------------

    /// Load today's quota counters, defaulting to all-zero
    pub fn quota(&self) -> QuotaBook {
        let counts: Vec<u32> = self.read_json(keys::QUOTA_PROGRESS);
        QuotaBook::from_counts(&counts)
    }

    /// Persist quota counters as the canonical integer sequence
    pub fn save_quota(&mut self, book: &QuotaBook) -> Result<()> {
        let text = serde_json::to_string(&book.counts())?;
        self.store.set(keys::QUOTA_PROGRESS, &text)
    }

    // ------------------------------------------------------------------
    // History, weight log, user name
    // ------------------------------------------------------------------

    /// Days with at least one completed workout
    pub fn history(&self) -> BTreeSet<NaiveDate> {
        let raw: Vec<String> = self.read_json(keys::WORKOUT_HISTORY);
        raw.iter()
            .filter_map(|s| match s.parse::<NaiveDate>() {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::warn!("Skipping malformed history date {:?}: {}", s, e);
                    None
                }
            })
            .collect()
    }

    fn save_history(&mut self, history: &BTreeSet<NaiveDate>) -> Result<()> {
        let raw: Vec<String> = history.iter().map(|d| d.to_string()).collect();
        let text = serde_json::to_string(&raw)?;
        self.store.set(keys::WORKOUT_HISTORY, &text)
    }

    pub fn weight_log(&self) -> Vec<WeightEntry> {
        self.read_json(keys::WEIGHT_DATA)
    }

    pub fn add_weight(&mut self, entry: WeightEntry) -> Result<()> {
        let mut log = self.weight_log();
        log.push(entry);
        let text = serde_json::to_string(&log)?;
        self.store.set(keys::WEIGHT_DATA, &text)
    }

    pub fn user_name(&self) -> String {
        match self.store.get(keys::USER_NAME) {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => "You".to_string(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}. Defaulting.", keys::USER_NAME, e);
                "You".to_string()
            }
        }
    }

    pub fn set_user_name(&mut self, name: &str) -> Result<()> {
        self.store.set(keys::USER_NAME, name.trim())
    }

    // ------------------------------------------------------------------
    // Completion and reset
    // ------------------------------------------------------------------

    /// Credit a completed workout to the ledger.
    ///
    /// Adds the workout's points, one workout, its duration in whole seconds
    /// and the flat calorie credit to the four cumulative counters, marks
    /// `today` in the workout history, and recomputes the streak counters,
    /// raising the personal best when the current streak passes it.
    ///
    /// Each key is written independently. A failed write is logged and
    /// skipped; the session does not wait on durability and never rolls
    /// back, so the summary reflects the intended new values either way.
    pub fn credit_workout(
        &mut self,
        points: u64,
        duration_seconds: u32,
        today: NaiveDate,
    ) -> CompletionSummary {
        let total_points = self.points() + points;
        let workouts_done = self.workouts_done() + 1;
        let total_minutes = self.total_minutes() + u64::from(duration_seconds);
        let calories_lost = self.calories_lost() + CALORIES_PER_WORKOUT;

        self.write_logged(keys::POINTS, total_points);
        self.write_logged(keys::WORKOUTS_DONE, workouts_done);
        self.write_logged(keys::TOTAL_MINUTES, total_minutes);
        self.write_logged(keys::CALORIES_LOST, calories_lost);

        let mut history = self.history();
        history.insert(today);
        if let Err(e) = self.save_history(&history) {
            tracing::warn!("Failed to write {}: {}", keys::WORKOUT_HISTORY, e);
        }

        let current_streak = stats::current_streak(&history, today);
        let personal_best_streak = self.personal_best_streak().max(current_streak);
        self.write_logged(keys::CURRENT_STREAK, u64::from(current_streak));
        self.write_logged(keys::BEST_STREAK, u64::from(personal_best_streak));

        tracing::info!(
            "Credited workout: +{} points (total {}), streak {} (best {})",
            points,
            total_points,
            current_streak,
            personal_best_streak
        );

        CompletionSummary {
            points_earned: points,
            total_points,
            current_streak,
            personal_best_streak,
        }
    }

    /// Remove every key the app owns
    pub fn reset(&mut self) -> Result<()> {
        for key in keys::ALL {
            self.store.remove(key)?;
        }
        tracing::info!("Progress ledger reset");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn read_json<T: serde::de::DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}. Defaulting.", key, e);
                return T::default();
            }
        };
        match raw {
            None => T::default(),
            Some(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!("Malformed value for {}: {}. Defaulting.", key, e);
                T::default()
            }),
        }
    }

    fn write_logged(&mut self, key: &str, value: u64) {
        if let Err(e) = self.write_u64(key, value) {
            tracing::warn!("Failed to write {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn ledger() -> ProgressLedger<MemoryStore> {
        ProgressLedger::new(MemoryStore::new())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_counters_default_to_zero() {
        let ledger = ledger();
        assert_eq!(ledger.totals(), Totals::default());
        assert_eq!(ledger.current_streak(), 0);
    }

    #[test]
    fn test_malformed_counter_defaults_to_zero() {
        let mut store = MemoryStore::new();
        store.set(keys::POINTS, "not-a-number").unwrap();
        let ledger = ProgressLedger::new(store);
        assert_eq!(ledger.points(), 0);
    }

    #[test]
    fn test_credit_workout_updates_all_four_counters() {
        let mut ledger = ledger();
        let summary = ledger.credit_workout(15, 5, date(2024, 3, 10));

        assert_eq!(summary.points_earned, 15);
        assert_eq!(summary.total_points, 15);
        assert_eq!(ledger.points(), 15);
        assert_eq!(ledger.workouts_done(), 1);
        assert_eq!(ledger.total_minutes(), 5);
        assert_eq!(ledger.calories_lost(), 100);
    }

    #[test]
    fn test_credit_workout_accumulates() {
        let mut ledger = ledger();
        ledger.credit_workout(15, 75, date(2024, 3, 10));
        let summary = ledger.credit_workout(25, 90, date(2024, 3, 10));

        assert_eq!(summary.total_points, 40);
        assert_eq!(ledger.workouts_done(), 2);
        assert_eq!(ledger.total_minutes(), 165);
        assert_eq!(ledger.calories_lost(), 200);
    }

    #[test]
    fn test_credit_workout_marks_history_once_per_day() {
        let mut ledger = ledger();
        ledger.credit_workout(15, 75, date(2024, 3, 10));
        ledger.credit_workout(25, 90, date(2024, 3, 10));

        assert_eq!(ledger.history().len(), 1);
        assert!(ledger.history().contains(&date(2024, 3, 10)));
    }

    #[test]
    fn test_streak_extends_across_consecutive_days() {
        let mut ledger = ledger();
        ledger.credit_workout(10, 60, date(2024, 3, 8));
        ledger.credit_workout(10, 60, date(2024, 3, 9));
        let summary = ledger.credit_workout(10, 60, date(2024, 3, 10));

        assert_eq!(summary.current_streak, 3);
        assert_eq!(summary.personal_best_streak, 3);
        assert_eq!(ledger.current_streak(), 3);
    }

    #[test]
    fn test_personal_best_survives_a_broken_streak() {
        let mut ledger = ledger();
        ledger.credit_workout(10, 60, date(2024, 3, 8));
        ledger.credit_workout(10, 60, date(2024, 3, 9));
        ledger.credit_workout(10, 60, date(2024, 3, 10));
        // Two days off, then a fresh start
        let summary = ledger.credit_workout(10, 60, date(2024, 3, 13));

        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.personal_best_streak, 3);
    }

    #[test]
    fn test_quota_roundtrip_is_identical() {
        let mut ledger = ledger();
        let mut book = ledger.quota();
        book.record("Pushups");
        book.record("Squats");
        ledger.save_quota(&book).unwrap();

        assert_eq!(ledger.quota(), book);
        assert_eq!(ledger.quota().counts(), book.counts());
    }

    #[test]
    fn test_malformed_quota_defaults_to_zero() {
        let mut store = MemoryStore::new();
        store.set(keys::QUOTA_PROGRESS, "{oops").unwrap();
        let ledger = ProgressLedger::new(store);
        assert_eq!(ledger.quota().counts(), vec![0; 9]);
    }

    #[test]
    fn test_history_skips_malformed_dates() {
        let mut store = MemoryStore::new();
        store
            .set(keys::WORKOUT_HISTORY, r#"["2024-03-10","yesterday"]"#)
            .unwrap();
        let ledger = ProgressLedger::new(store);
        let history = ledger.history();
        assert_eq!(history.len(), 1);
        assert!(history.contains(&date(2024, 3, 10)));
    }

    #[test]
    fn test_weight_log_appends() {
        let mut ledger = ledger();
        ledger
            .add_weight(WeightEntry {
                date: date(2024, 3, 10),
                weight: 81.0,
            })
            .unwrap();
        ledger
            .add_weight(WeightEntry {
                date: date(2024, 3, 11),
                weight: 80.5,
            })
            .unwrap();

        let log = ledger.weight_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].weight, 80.5);
    }

    #[test]
    fn test_user_name_defaults_and_trims() {
        let mut ledger = ledger();
        assert_eq!(ledger.user_name(), "You");

        ledger.set_user_name("  Dana  ").unwrap();
        assert_eq!(ledger.user_name(), "Dana");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ledger = ledger();
        ledger.credit_workout(15, 75, date(2024, 3, 10));
        ledger.set_user_name("Dana").unwrap();
        let mut book = ledger.quota();
        book.record("Pushups");
        ledger.save_quota(&book).unwrap();

        ledger.reset().unwrap();

        assert_eq!(ledger.totals(), Totals::default());
        assert_eq!(ledger.user_name(), "You");
        assert_eq!(ledger.quota().counts(), vec![0; 9]);
        assert!(ledger.history().is_empty());
    }
}
