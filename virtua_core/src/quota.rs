//! Daily quota tracking per canonical exercise.
//!
//! Each canonical exercise has a fixed per-day repetition cap. Counts are
//! kept as an ordered name-to-record mapping; the wire format under the
//! `quotaProgress` key stays a plain JSON sequence of integers in canonical
//! order, so the stored layout is unchanged.

/// Canonical exercise names and their per-day caps, in wire order
pub const DAILY_QUOTA: [(&str, u32); 9] = [
    ("Pushups", 15),
    ("Squats", 20),
    ("Burpees", 10),
    ("Jumping Jacks", 30),
    ("Planks", 15),
    ("Lunges", 20),
    ("Mountain Climbers", 10),
    ("Crunches", 25),
    ("Dips", 15),
];

/// Progress against one canonical exercise's daily cap
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotaSlot {
    pub name: &'static str,
    pub cap: u32,
    pub count: u32,
}

impl QuotaSlot {
    pub fn is_met(&self) -> bool {
        self.count >= self.cap
    }
}

/// Today's quota counters for all canonical exercises.
///
/// Slot order is fixed to [`DAILY_QUOTA`]; lookups go by name, never by
/// position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotaBook {
    slots: Vec<QuotaSlot>,
}

impl Default for QuotaBook {
    fn default() -> Self {
        Self::from_counts(&[])
    }
}

impl QuotaBook {
    /// Rebuild the book from a stored count sequence.
    ///
    /// Missing trailing entries default to zero; surplus entries are ignored.
    pub fn from_counts(counts: &[u32]) -> Self {
        let slots = DAILY_QUOTA
            .iter()
            .enumerate()
            .map(|(i, &(name, cap))| QuotaSlot {
                name,
                cap,
                count: counts.get(i).copied().unwrap_or(0),
            })
            .collect();
        Self { slots }
    }

    /// Count sequence in canonical order, for persistence
    pub fn counts(&self) -> Vec<u32> {
        self.slots.iter().map(|s| s.count).collect()
    }

    pub fn slots(&self) -> &[QuotaSlot] {
        &self.slots
    }

    pub fn get(&self, exercise_name: &str) -> Option<&QuotaSlot> {
        self.slots.iter().find(|s| s.name == exercise_name)
    }

    /// Record one completed repetition of the named exercise.
    ///
    /// Increments beyond the cap are clamped, not rejected. Returns false if
    /// the name is not a canonical quota exercise, in which case nothing is
    /// recorded.
    pub fn record(&mut self, exercise_name: &str) -> bool {
        match self.slots.iter_mut().find(|s| s.name == exercise_name) {
            Some(slot) => {
                slot.count = (slot.count + 1).min(slot.cap);
                tracing::debug!(
                    "Quota {}: {}/{}",
                    slot.name,
                    slot.count,
                    slot.cap
                );
                true
            }
            None => {
                tracing::debug!("Exercise '{}' is not part of the daily quota", exercise_name);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_book_is_all_zero() {
        let book = QuotaBook::default();
        assert_eq!(book.counts(), vec![0; 9]);
    }

    #[test]
    fn test_record_increments_by_name() {
        let mut book = QuotaBook::default();
        assert!(book.record("Burpees"));
        assert_eq!(book.get("Burpees").unwrap().count, 1);
        // Other slots untouched
        assert_eq!(book.get("Pushups").unwrap().count, 0);
    }

    #[test]
    fn test_record_clamps_at_cap() {
        let mut book = QuotaBook::default();
        for _ in 0..50 {
            book.record("Burpees");
        }
        assert_eq!(book.get("Burpees").unwrap().count, 10);
        assert!(book.get("Burpees").unwrap().is_met());
    }

    #[test]
    fn test_record_unknown_exercise_is_noop() {
        let mut book = QuotaBook::default();
        assert!(!book.record("Handstands"));
        assert_eq!(book.counts(), vec![0; 9]);
    }

    #[test]
    fn test_from_counts_tolerates_short_and_long_input() {
        let short = QuotaBook::from_counts(&[3, 1]);
        assert_eq!(short.get("Pushups").unwrap().count, 3);
        assert_eq!(short.get("Squats").unwrap().count, 1);
        assert_eq!(short.get("Dips").unwrap().count, 0);

        let long = QuotaBook::from_counts(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 99]);
        assert_eq!(long.counts(), vec![0; 9]);
    }

    #[test]
    fn test_counts_roundtrip() {
        let mut book = QuotaBook::default();
        book.record("Pushups");
        book.record("Dips");
        book.record("Dips");

        let restored = QuotaBook::from_counts(&book.counts());
        assert_eq!(restored, book);
    }
}
