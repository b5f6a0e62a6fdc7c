//! Derived read-only statistics: rank, BMI, streaks, standings.
//!
//! Nothing here writes to the store; these are the computations the
//! statistics and rankings surfaces present from ledger values or direct
//! user input.

use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Rank
// ============================================================================

/// User rank bracket derived from cumulative points
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rank {
    Beginner,
    Advanced,
    Pro,
}

impl Rank {
    /// Bracket boundaries: above 100 points is Pro, above 50 is Advanced.
    pub fn for_points(points: u64) -> Self {
        if points > 100 {
            Rank::Pro
        } else if points > 50 {
            Rank::Advanced
        } else {
            Rank::Beginner
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rank::Beginner => "Beginner",
            Rank::Advanced => "Advanced",
            Rank::Pro => "Pro",
        };
        write!(f, "{}", label)
    }
}

// ============================================================================
// BMI
// ============================================================================

/// Height input, in the units the user typed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Height {
    Centimetres(f64),
    FeetInches(f64, f64),
}

impl Height {
    pub fn metres(&self) -> f64 {
        match *self {
            Height::Centimetres(cm) => cm / 100.0,
            Height::FeetInches(feet, inches) => feet * 0.3048 + inches * 0.0254,
        }
    }
}

/// Weight input, in the units the user typed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Weight {
    Kilograms(f64),
    Pounds(f64),
}

impl Weight {
    pub fn kilograms(&self) -> f64 {
        match *self {
            Weight::Kilograms(kg) => kg,
            Weight::Pounds(lbs) => lbs * 0.453592,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
        };
        write!(f, "{}", label)
    }
}

impl BmiCategory {
    /// Category thresholds applied to the already-rounded value
    pub fn for_value(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else {
            BmiCategory::Overweight
        }
    }
}

/// A computed BMI value (rounded to 2 decimals) with its category
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiReading {
    pub value: f64,
    pub category: BmiCategory,
}

/// Compute BMI as kg / m², rounded to 2 decimals.
///
/// The category is derived from the rounded value, matching what the user
/// sees on screen.
pub fn bmi(height: Height, weight: Weight) -> Result<BmiReading> {
    let metres = height.metres();
    if !(metres > 0.0) {
        return Err(Error::Measurement("height must be positive".into()));
    }
    let kilograms = weight.kilograms();
    if !(kilograms > 0.0) {
        return Err(Error::Measurement("weight must be positive".into()));
    }

    let raw = kilograms / (metres * metres);
    let value = (raw * 100.0).round() / 100.0;
    Ok(BmiReading {
        value,
        category: BmiCategory::for_value(value),
    })
}

// ============================================================================
// Streaks
// ============================================================================

/// Current consecutive-day streak ending at `today`.
///
/// Counts back from `today` until the first date missing from the history
/// set. A day without a completed workout today means a streak of zero.
pub fn current_streak(history: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while history.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

// ============================================================================
// Standings
// ============================================================================

/// Built-in leaderboard entries the user competes against
pub const TOP_USERS: [(&str, u64); 10] = [
    ("Alex Champion", 150),
    ("Sarah Fit", 140),
    ("Mike Strong", 130),
    ("Emma Power", 120),
    ("John Flex", 110),
    ("Lisa Tone", 100),
    ("Tom Bulk", 90),
    ("Anna Sweat", 80),
    ("David Pump", 70),
    ("Bella Burn", 60),
];

/// One row of the rankings board
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandingsEntry {
    pub name: String,
    pub points: u64,
    pub is_user: bool,
}

/// Top-10 standings with the user slotted in by points
pub fn standings(user_name: &str, user_points: u64) -> Vec<StandingsEntry> {
    let mut rows: Vec<StandingsEntry> = TOP_USERS
        .iter()
        .map(|&(name, points)| StandingsEntry {
            name: name.to_string(),
            points,
            is_user: false,
        })
        .collect();

    rows.push(StandingsEntry {
        name: user_name.to_string(),
        points: user_points,
        is_user: true,
    });

    rows.sort_by(|a, b| b.points.cmp(&a.points));
    rows.truncate(10);
    rows
}
