//! Built-in workout catalog.
//!
//! This module provides the workouts shown on the home and discovery
//! surfaces. Exercise names are canonical quota names so completed
//! repetitions count toward the daily quota.

use crate::quota::DAILY_QUOTA;
use crate::types::*;
use once_cell::sync::Lazy;

/// Cached built-in catalog - built once and reused across all operations
static BUILTIN_CATALOG: Lazy<Vec<Workout>> = Lazy::new(build_builtin_catalog);

/// All built-in workouts, in display order
pub fn builtin_workouts() -> &'static [Workout] {
    &BUILTIN_CATALOG
}

/// Look up a built-in workout by id
pub fn find_workout(id: &str) -> Option<&'static Workout> {
    BUILTIN_CATALOG.iter().find(|w| w.id == id)
}

/// Case-insensitive name substring search, as the home screen search bar does
pub fn search(query: &str) -> Vec<&'static Workout> {
    let needle = query.to_lowercase();
    BUILTIN_CATALOG
        .iter()
        .filter(|w| w.name.to_lowercase().contains(&needle))
        .collect()
}

/// Discovery filter by audience bracket and/or body part
pub fn discover(audience: Option<Audience>, body_part: Option<BodyPart>) -> Vec<&'static Workout> {
    BUILTIN_CATALOG
        .iter()
        .filter(|w| audience.map_or(true, |a| w.audience == a))
        .filter(|w| body_part.map_or(true, |b| w.body_part == b))
        .collect()
}

fn build_builtin_catalog() -> Vec<Workout> {
    vec![
        Workout {
            id: "starting_arms".into(),
            name: "Starting Arms".into(),
            description: "Beginner arm workout".into(),
            difficulty: Difficulty::Easy,
            audience: Audience::Beginners,
            body_part: BodyPart::UpperBody,
            points: 15,
            exercises: vec![Exercise::new("Pushups", 30)],
        },
        Workout {
            id: "full_body_blast".into(),
            name: "Full Body Blast".into(),
            description: "Complete body routine".into(),
            difficulty: Difficulty::Medium,
            audience: Audience::Beginners,
            body_part: BodyPart::FullBody,
            points: 15,
            exercises: vec![Exercise::new("Pushups", 30), Exercise::new("Squats", 45)],
        },
        Workout {
            id: "upper_body_strength".into(),
            name: "Upper Body Strength".into(),
            description: "Push and hold for upper-body strength".into(),
            difficulty: Difficulty::Medium,
            audience: Audience::Advanced,
            body_part: BodyPart::UpperBody,
            points: 25,
            exercises: vec![Exercise::new("Pushups", 30), Exercise::new("Planks", 60)],
        },
        Workout {
            id: "cardio_kickstart".into(),
            name: "Cardio Kickstart".into(),
            description: "High-energy cardio".into(),
            difficulty: Difficulty::Hard,
            audience: Audience::Pros,
            body_part: BodyPart::FullBody,
            points: 30,
            exercises: vec![
                Exercise::new("Jumping Jacks", 30),
                Exercise::new("Burpees", 45),
            ],
        },
        Workout {
            id: "core_crusher".into(),
            name: "Core Crusher".into(),
            description: "Crunch and climb through your core".into(),
            difficulty: Difficulty::Medium,
            audience: Audience::Advanced,
            body_part: BodyPart::Core,
            points: 20,
            exercises: vec![
                Exercise::new("Crunches", 40),
                Exercise::new("Mountain Climbers", 30),
                Exercise::new("Planks", 45),
            ],
        },
        Workout {
            id: "leg_day_lite".into(),
            name: "Leg Day Lite".into(),
            description: "Squats and lunges without the barbell".into(),
            difficulty: Difficulty::Easy,
            audience: Audience::Beginners,
            body_part: BodyPart::LowerBody,
            points: 20,
            exercises: vec![Exercise::new("Squats", 40), Exercise::new("Lunges", 40)],
        },
    ]
}

/// Validate a workout list for consistency and completeness.
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate(workouts: &[Workout]) -> Vec<String> {
    let mut errors = Vec::new();

    for (i, workout) in workouts.iter().enumerate() {
        if workout.id.is_empty() {
            errors.push(format!("Workout #{} has an empty id", i));
        }
        if workout.name.is_empty() {
            errors.push(format!("Workout '{}' has an empty name", workout.id));
        }
        if workout.exercises.is_empty() {
            errors.push(format!("Workout '{}' has no exercises", workout.id));
        }
        if workouts.iter().filter(|w| w.id == workout.id).count() > 1 {
            errors.push(format!("Duplicate workout id '{}'", workout.id));
        }

        // Check that all exercises count toward the daily quota
        for exercise in &workout.exercises {
            if !DAILY_QUOTA.iter().any(|&(name, _)| name == exercise.name) {
                errors.push(format!(
                    "Workout '{}' references non-quota exercise '{}'",
                    workout.id, exercise.name
                ));
            }
        }
    }

    errors
}
