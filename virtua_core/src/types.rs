//! Core domain types for the Virtua Fitness system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workouts and their exercises
//! - Difficulty / audience / body-part classification
//! - Weight log entries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Workout Types
// ============================================================================

/// A single timed exercise within a workout.
///
/// The name doubles as the lookup key into daily quota tracking, so workouts
/// that should count toward a quota must use the canonical spelling (see
/// [`crate::quota::DAILY_QUOTA`]).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    pub duration_seconds: u32,
}

impl Exercise {
    pub fn new(name: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
        }
    }
}

/// Workout difficulty shown to the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Target audience bracket used by the discovery listing
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Beginners,
    Advanced,
    Pros,
}

impl Audience {
    pub fn label(&self) -> &'static str {
        match self {
            Audience::Beginners => "Beginners",
            Audience::Advanced => "Advanced",
            Audience::Pros => "Pros",
        }
    }
}

/// Body region a workout targets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    FullBody,
    UpperBody,
    LowerBody,
    Core,
}

impl BodyPart {
    pub fn label(&self) -> &'static str {
        match self {
            BodyPart::FullBody => "Full Body",
            BodyPart::UpperBody => "Upper Body",
            BodyPart::LowerBody => "Lower Body",
            BodyPart::Core => "Core",
        }
    }
}

/// A complete workout definition
///
/// Immutable once constructed; a session derives its exercise sequence from
/// the workout at start and never mutates it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub audience: Audience,
    pub body_part: BodyPart,
    pub points: u64,
    pub exercises: Vec<Exercise>,
}

impl Workout {
    /// Sum of all exercise durations in seconds
    pub fn total_seconds(&self) -> u32 {
        self.exercises.iter().map(|e| e.duration_seconds).sum()
    }
}

// ============================================================================
// Weight Log Types
// ============================================================================

/// One entry in the append-only weight log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_workout() -> Workout {
        Workout {
            id: "full_body_blast".into(),
            name: "Full Body Blast".into(),
            description: "Complete body routine".into(),
            difficulty: Difficulty::Medium,
            audience: Audience::Beginners,
            body_part: BodyPart::FullBody,
            points: 15,
            exercises: vec![Exercise::new("Pushups", 30), Exercise::new("Squats", 45)],
        }
    }

    #[test]
    fn test_total_seconds_sums_exercises() {
        assert_eq!(sample_workout().total_seconds(), 75);
    }

    #[test]
    fn test_total_seconds_empty_workout() {
        let mut workout = sample_workout();
        workout.exercises.clear();
        assert_eq!(workout.total_seconds(), 0);
    }

    #[test]
    fn test_weight_entry_serializes_date_as_plain_day() {
        let entry = WeightEntry {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            weight: 70.0,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"2023-01-01\""));
    }
}
