use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use virtua_core::*;

#[derive(Parser)]
#[command(name = "virtua")]
#[command(about = "Local-first fitness tracker with workout sessions and daily quotas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the workout catalog
    List {
        /// Filter by name substring
        #[arg(long)]
        search: Option<String>,

        /// Filter by audience (beginners, advanced, pros)
        #[arg(long)]
        audience: Option<String>,

        /// Filter by body part (full, upper, lower, core)
        #[arg(long)]
        body_part: Option<String>,
    },

    /// Run a workout session
    Start {
        /// Workout id (see `virtua list`)
        workout: String,

        /// Complete immediately without the countdown timer
        #[arg(long)]
        auto_complete: bool,
    },

    /// Show today's quota progress
    Quota,

    /// Show cumulative statistics, streaks and the weight log
    Stats,

    /// Log a body-weight entry
    Weight {
        value: f64,

        /// Weight unit (kg, lbs)
        #[arg(long, default_value = "kg")]
        unit: String,
    },

    /// Calculate BMI from height and weight
    Bmi {
        /// Height, e.g. 180 (cm) or 5,11 (feet,inches)
        #[arg(long)]
        height: String,

        /// Height unit (cm, ftin)
        #[arg(long, default_value = "cm")]
        height_unit: String,

        #[arg(long)]
        weight: f64,

        /// Weight unit (kg, lbs)
        #[arg(long, default_value = "kg")]
        weight_unit: String,
    },

    /// Show your rank and the top-10 board
    Rank,

    /// Show or set the display name
    Name { new_name: Option<String> },

    /// Erase all locally stored progress
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    virtua_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::List {
            search,
            audience,
            body_part,
        }) => cmd_list(search, audience, body_part),
        Some(Commands::Start {
            workout,
            auto_complete,
        }) => cmd_start(&data_dir, &workout, auto_complete, &config),
        Some(Commands::Quota) => cmd_quota(&data_dir),
        Some(Commands::Stats) => cmd_stats(&data_dir),
        Some(Commands::Weight { value, unit }) => cmd_weight(&data_dir, value, &unit),
        Some(Commands::Bmi {
            height,
            height_unit,
            weight,
            weight_unit,
        }) => cmd_bmi(&height, &height_unit, weight, &weight_unit),
        Some(Commands::Rank) => cmd_rank(&data_dir),
        Some(Commands::Name { new_name }) => cmd_name(&data_dir, new_name),
        Some(Commands::Reset { yes }) => cmd_reset(&data_dir, yes),
        None => cmd_home(&data_dir),
    }
}

fn open_ledger(data_dir: &Path) -> Result<ProgressLedger<FileStore>> {
    std::fs::create_dir_all(data_dir)?;
    Ok(ProgressLedger::new(FileStore::in_data_dir(data_dir)))
}

// ============================================================================
// Home and catalog
// ============================================================================

fn cmd_home(data_dir: &Path) -> Result<()> {
    let ledger = open_ledger(data_dir)?;

    println!("Welcome {}, ready for PEAK FITNESS?", ledger.user_name());
    println!();
    println!("Popular Workouts");
    for workout in builtin_workouts() {
        display_workout_row(workout);
    }
    println!();
    println!("Today's Quota");
    display_quota(&ledger.quota());
    Ok(())
}

fn cmd_list(
    search: Option<String>,
    audience: Option<String>,
    body_part: Option<String>,
) -> Result<()> {
    let audience = audience.as_deref().map(parse_audience).transpose()?;
    let body_part = body_part.as_deref().map(parse_body_part).transpose()?;

    let mut workouts = catalog::discover(audience, body_part);
    if let Some(query) = search {
        let needle = query.to_lowercase();
        workouts.retain(|w| w.name.to_lowercase().contains(&needle));
    }

    if workouts.is_empty() {
        println!("No workouts match.");
        return Ok(());
    }

    for workout in workouts {
        display_workout_row(workout);
    }
    Ok(())
}

fn parse_audience(s: &str) -> Result<Audience> {
    match s.to_lowercase().as_str() {
        "beginners" | "beginner" => Ok(Audience::Beginners),
        "advanced" => Ok(Audience::Advanced),
        "pros" | "pro" => Ok(Audience::Pros),
        other => Err(Error::Other(format!(
            "Unknown audience '{}' (expected beginners, advanced or pros)",
            other
        ))),
    }
}

fn parse_body_part(s: &str) -> Result<BodyPart> {
    match s.to_lowercase().as_str() {
        "full" | "full_body" | "fullbody" => Ok(BodyPart::FullBody),
        "upper" | "upper_body" => Ok(BodyPart::UpperBody),
        "lower" | "lower_body" => Ok(BodyPart::LowerBody),
        "core" => Ok(BodyPart::Core),
        other => Err(Error::Other(format!(
            "Unknown body part '{}' (expected full, upper, lower or core)",
            other
        ))),
    }
}

// ============================================================================
// Workout player
// ============================================================================

#[derive(Clone)]
enum PlayerEvent {
    Tick,
    Line(String),
}

fn cmd_start(data_dir: &Path, id: &str, auto_complete: bool, config: &Config) -> Result<()> {
    let workout = find_workout(id)
        .ok_or_else(|| Error::Other(format!("Unknown workout '{}'. Try `virtua list`.", id)))?;

    let ledger = open_ledger(data_dir)?;
    let mut session = SessionController::new(workout.clone(), ledger)?;

    display_workout_header(workout);
    session.start()?;

    if auto_complete {
        loop {
            match session.tick() {
                TickOutcome::ExerciseFinished { finished, .. } => {
                    println!("  ✓ {}", workout.exercises[finished].name);
                }
                TickOutcome::Completed(summary) => {
                    println!("  ✓ {}", workout.exercises.last().map(|e| e.name.as_str()).unwrap_or(""));
                    display_summary(&summary);
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    run_player(session, config.player.tick_millis)
}

fn run_player(mut session: SessionController<FileStore>, tick_millis: u64) -> Result<()> {
    println!("Press Enter to pause/resume, 'c' + Enter to cancel.");
    println!();

    let (tx, rx) = mpsc::channel();

    // Stdin reader feeds the same event loop as the ticker
    let input_tx = tx.clone();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            if stdin.read_line(&mut line).is_err() {
                break;
            }
            if input_tx
                .send(PlayerEvent::Line(line.trim().to_lowercase()))
                .is_err()
            {
                break;
            }
        }
    });

    let period = Duration::from_millis(tick_millis);
    let mut ticker = Some(SecondTicker::with_period(
        tx.clone(),
        PlayerEvent::Tick,
        period,
    ));

    announce_exercise(&session);

    while let Ok(event) = rx.recv() {
        match event {
            PlayerEvent::Tick => match session.tick() {
                TickOutcome::Counting { remaining } => {
                    render_countdown(&session, remaining)?;
                }
                TickOutcome::ExerciseFinished { finished, .. } => {
                    println!("\r  ✓ {:<40}", session.workout().exercises[finished].name);
                    announce_exercise(&session);
                }
                TickOutcome::Completed(summary) => {
                    if let Some(t) = ticker.take() {
                        t.cancel();
                    }
                    let last = session.workout().exercises.len() - 1;
                    println!("\r  ✓ {:<40}", session.workout().exercises[last].name);
                    display_summary(&summary);
                    return Ok(());
                }
                TickOutcome::Idle => {}
            },
            PlayerEvent::Line(cmd) => match cmd.as_str() {
                "c" | "q" | "cancel" => {
                    // Stop the timer first; no tick lands after this
                    if let Some(t) = ticker.take() {
                        t.cancel();
                    }
                    session.cancel()?;
                    println!("\nWorkout cancelled - no points earned.");
                    return Ok(());
                }
                _ => match session.phase() {
                    SessionPhase::Running => {
                        if let Some(t) = ticker.take() {
                            t.cancel();
                        }
                        session.pause()?;
                        println!(
                            "\nPaused at {} remaining. Press Enter to resume.",
                            fmt_mmss(session.time_remaining())
                        );
                    }
                    SessionPhase::Paused => {
                        session.resume()?;
                        ticker = Some(SecondTicker::with_period(
                            tx.clone(),
                            PlayerEvent::Tick,
                            period,
                        ));
                        println!("Resumed.");
                    }
                    _ => {}
                },
            },
        }
    }

    Ok(())
}

fn announce_exercise(session: &SessionController<FileStore>) {
    if let Some(exercise) = session.current_exercise() {
        match session.next_exercise() {
            Some(next) => println!(
                "  {} ({}) - next up: {}",
                exercise.name,
                fmt_mmss(exercise.duration_seconds),
                next.name
            ),
            None => println!(
                "  {} ({}) - last one!",
                exercise.name,
                fmt_mmss(exercise.duration_seconds)
            ),
        }
    }
}

fn render_countdown(session: &SessionController<FileStore>, remaining: u32) -> Result<()> {
    if let Some(exercise) = session.current_exercise() {
        print!("\r  {:<24} {:>7} left ", exercise.name, fmt_mmss(remaining));
        io::stdout().flush()?;
    }
    Ok(())
}

// ============================================================================
// Quota, statistics, weight
// ============================================================================

fn cmd_quota(data_dir: &Path) -> Result<()> {
    let ledger = open_ledger(data_dir)?;
    println!("Today's Quota");
    display_quota(&ledger.quota());
    Ok(())
}

fn cmd_stats(data_dir: &Path) -> Result<()> {
    let ledger = open_ledger(data_dir)?;
    let totals = ledger.totals();

    println!("Workouts Done: {}", totals.workouts_done);
    println!("Total Minutes: {}", totals.total_minutes);
    println!("Calories Lost: {}", totals.calories_lost);
    println!();

    let history = ledger.history();
    let today = Utc::now().date_naive();
    let mut calendar = String::new();
    for i in (0..30).rev() {
        let day = today - ChronoDuration::days(i);
        calendar.push(if history.contains(&day) { '█' } else { '·' });
    }
    println!("History (last 30 days): {}", calendar);
    println!("Current Streak: {} days", ledger.current_streak());
    println!("Personal Best: {} days", ledger.personal_best_streak());

    let weight_log = ledger.weight_log();
    if !weight_log.is_empty() {
        println!();
        println!("Weight log:");
        for entry in weight_log.iter().rev().take(5) {
            println!("  {}: {:.1} kg", entry.date, entry.weight);
        }
    }
    Ok(())
}

fn cmd_weight(data_dir: &Path, value: f64, unit: &str) -> Result<()> {
    let weight = parse_weight(value, unit)?;
    let kilograms = weight.kilograms();
    if kilograms <= 0.0 {
        return Err(Error::Measurement("weight must be positive".into()));
    }

    let mut ledger = open_ledger(data_dir)?;
    ledger.add_weight(WeightEntry {
        date: Utc::now().date_naive(),
        weight: kilograms,
    })?;

    println!("✓ Logged {:.1} kg", kilograms);
    Ok(())
}

fn cmd_bmi(height: &str, height_unit: &str, weight: f64, weight_unit: &str) -> Result<()> {
    let height = parse_height(height, height_unit)?;
    let weight = parse_weight(weight, weight_unit)?;

    let reading = stats::bmi(height, weight)?;
    println!("Your BMI: {:.2} ({})", reading.value, reading.category);
    Ok(())
}

fn parse_height(text: &str, unit: &str) -> Result<Height> {
    match unit.to_lowercase().as_str() {
        "cm" => {
            let cm: f64 = text
                .trim()
                .parse()
                .map_err(|_| Error::Measurement(format!("Invalid height '{}'", text)))?;
            Ok(Height::Centimetres(cm))
        }
        "ftin" | "ft,in" => {
            let (feet, inches) = text
                .split_once(',')
                .ok_or_else(|| Error::Measurement("Expected height as feet,inches".into()))?;
            let feet: f64 = feet
                .trim()
                .parse()
                .map_err(|_| Error::Measurement(format!("Invalid feet '{}'", feet)))?;
            let inches: f64 = inches
                .trim()
                .parse()
                .map_err(|_| Error::Measurement(format!("Invalid inches '{}'", inches)))?;
            Ok(Height::FeetInches(feet, inches))
        }
        other => Err(Error::Measurement(format!(
            "Unknown height unit '{}' (expected cm or ftin)",
            other
        ))),
    }
}

fn parse_weight(value: f64, unit: &str) -> Result<Weight> {
    match unit.to_lowercase().as_str() {
        "kg" => Ok(Weight::Kilograms(value)),
        "lbs" | "lb" => Ok(Weight::Pounds(value)),
        other => Err(Error::Measurement(format!(
            "Unknown weight unit '{}' (expected kg or lbs)",
            other
        ))),
    }
}

// ============================================================================
// Rank, name, reset
// ============================================================================

fn cmd_rank(data_dir: &Path) -> Result<()> {
    let ledger = open_ledger(data_dir)?;
    let name = ledger.user_name();
    let points = ledger.points();

    println!("{}", name);
    println!("Rank: {}", Rank::for_points(points));
    println!("{} Virtua Points", points);
    println!();
    println!("Top 10 Rankings");
    for (i, row) in stats::standings(&name, points).iter().enumerate() {
        let marker = if row.is_user { "→" } else { " " };
        println!(
            " {} {:>2}. {:<20} {:>4} Points",
            marker,
            i + 1,
            row.name,
            row.points
        );
    }
    Ok(())
}

fn cmd_name(data_dir: &Path, new_name: Option<String>) -> Result<()> {
    let mut ledger = open_ledger(data_dir)?;
    match new_name {
        Some(name) if !name.trim().is_empty() => {
            ledger.set_user_name(&name)?;
            println!("✓ Name set to {}", name.trim());
        }
        Some(_) => {
            return Err(Error::Other("Name cannot be empty".into()));
        }
        None => {
            println!("{}", ledger.user_name());
        }
    }
    Ok(())
}

fn cmd_reset(data_dir: &Path, yes: bool) -> Result<()> {
    if !yes {
        print!("Erase all progress? This cannot be undone. [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Nothing erased.");
            return Ok(());
        }
    }

    let mut ledger = open_ledger(data_dir)?;
    ledger.reset()?;
    println!("✓ All progress erased.");
    Ok(())
}

// ============================================================================
// Display helpers
// ============================================================================

fn fmt_mmss(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn display_workout_row(workout: &Workout) {
    println!(
        "  {:<22} {:<9} {:<10} {:>5}  {:>3} pts  ({})",
        workout.name,
        workout.difficulty.label(),
        workout.body_part.label(),
        fmt_mmss(workout.total_seconds()),
        workout.points,
        workout.id
    );
}

fn display_workout_header(workout: &Workout) {
    println!("╭─────────────────────────────────────────╮");
    println!("│  {}", workout.name);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", workout.description);
    println!(
        "  {} · {} · Total Time: {}",
        workout.difficulty.label(),
        workout.body_part.label(),
        fmt_mmss(workout.total_seconds())
    );
    println!();
    for exercise in &workout.exercises {
        println!(
            "  → {} ({})",
            exercise.name,
            fmt_mmss(exercise.duration_seconds)
        );
    }
    println!();
}

fn display_quota(quota: &QuotaBook) {
    for slot in quota.slots() {
        let filled = ((slot.count * 10) / slot.cap) as usize;
        println!(
            "  {:<18} {:>2}/{:<2} [{}{}]",
            slot.name,
            slot.count,
            slot.cap,
            "#".repeat(filled),
            "-".repeat(10 - filled)
        );
    }
}

fn display_summary(summary: &CompletionSummary) {
    println!();
    println!(
        "✓ Workout Completed! You earned {} Virtua Points! Total: {}",
        summary.points_earned, summary.total_points
    );
    println!(
        "  Current streak: {} days (personal best: {})",
        summary.current_streak, summary.personal_best_streak
    );
}
