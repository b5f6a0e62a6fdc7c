//! Workout session state machine.
//!
//! A session drives one workout from start to completion or cancellation:
//! `NotStarted → Running → {Paused ⇄ Running} → Completed | Cancelled`.
//!
//! The controller owns the session state exclusively and exposes [`tick`] as
//! a pure transition: callers (the interactive player, or tests advancing a
//! virtual clock) invoke it once per elapsed second. Timer scheduling lives
//! outside, in [`crate::ticker`].
//!
//! [`tick`]: SessionController::tick

use crate::ledger::{CompletionSummary, ProgressLedger};
use crate::store::KvStore;
use crate::{Error, Exercise, QuotaBook, Result, Workout};
use chrono::Utc;

/// Lifecycle phase of a workout session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Running,
    Paused,
    Completed,
    Cancelled,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Completed | SessionPhase::Cancelled)
    }
}

/// Result of advancing the session by one second
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Not running; the tick changed nothing
    Idle,
    /// Still inside the current exercise
    Counting { remaining: u32 },
    /// An exercise finished and the session moved to the next one
    ExerciseFinished { finished: usize, remaining: u32 },
    /// The last exercise finished and the session completed
    Completed(CompletionSummary),
}

/// Owns one active workout session.
///
/// Created per workout run, destroyed when the session reaches a terminal
/// phase or the caller walks away. The ledger is injected so tests can
/// substitute an in-memory store.
pub struct SessionController<S: KvStore> {
    workout: Workout,
    ledger: ProgressLedger<S>,
    quota: QuotaBook,
    phase: SessionPhase,
    current: usize,
    time_remaining: u32,
}

impl<S: KvStore> SessionController<S> {
    /// Build a controller for one run-through of `workout`.
    ///
    /// A workout with no exercises is a precondition violation and is
    /// rejected here rather than producing a session with nothing to run.
    /// Quota counters are loaded once, at session entry.
    pub fn new(workout: Workout, ledger: ProgressLedger<S>) -> Result<Self> {
        if workout.exercises.is_empty() {
            return Err(Error::Session(format!(
                "Workout '{}' has no exercises",
                workout.name
            )));
        }

        let quota = ledger.quota();
        Ok(Self {
            workout,
            ledger,
            quota,
            phase: SessionPhase::NotStarted,
            current: 0,
            time_remaining: 0,
        })
    }

    /// Begin the session. Valid only from `NotStarted`.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != SessionPhase::NotStarted {
            return Err(Error::Session(format!(
                "Cannot start a session in phase {:?}",
                self.phase
            )));
        }

        self.current = 0;
        self.time_remaining = self.workout.exercises[0].duration_seconds;
        self.phase = SessionPhase::Running;
        tracing::info!(
            "Session started: {} ({} exercises, {}s)",
            self.workout.name,
            self.workout.exercises.len(),
            self.workout.total_seconds()
        );
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// A no-op unless `Running`, so a stray tick delivered after pause,
    /// completion, or cancellation changes nothing. When the current
    /// exercise's timer reaches zero its repetition is recorded into the
    /// quota (clamped at the cap) and the quota is persisted immediately; a
    /// failed quota write is logged and the session carries on. A
    /// zero-duration exercise finishes on the first tick that observes it.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Idle;
        }

        if self.time_remaining > 0 {
            self.time_remaining -= 1;
        }
        if self.time_remaining > 0 {
            return TickOutcome::Counting {
                remaining: self.time_remaining,
            };
        }

        let finished = self.current;
        let name = self.workout.exercises[finished].name.clone();
        self.quota.record(&name);
        if let Err(e) = self.ledger.save_quota(&self.quota) {
            tracing::warn!("Failed to persist quota progress: {}", e);
        }

        if finished + 1 < self.workout.exercises.len() {
            self.current = finished + 1;
            self.time_remaining = self.workout.exercises[self.current].duration_seconds;
            tracing::debug!(
                "Exercise '{}' finished, next up '{}' ({}s)",
                name,
                self.workout.exercises[self.current].name,
                self.time_remaining
            );
            TickOutcome::ExerciseFinished {
                finished,
                remaining: self.time_remaining,
            }
        } else {
            TickOutcome::Completed(self.finalize())
        }
    }

    /// Suspend the countdown. Valid only from `Running`.
    pub fn pause(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Running {
            return Err(Error::Session(format!(
                "Cannot pause a session in phase {:?}",
                self.phase
            )));
        }
        self.phase = SessionPhase::Paused;
        tracing::debug!("Session paused at {}s remaining", self.time_remaining);
        Ok(())
    }

    /// Resume from pause with the exact remaining time held at suspension.
    pub fn resume(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Paused {
            return Err(Error::Session(format!(
                "Cannot resume a session in phase {:?}",
                self.phase
            )));
        }
        self.phase = SessionPhase::Running;
        tracing::debug!("Session resumed at {}s remaining", self.time_remaining);
        Ok(())
    }

    /// Complete the session explicitly. Valid only from `Running`.
    ///
    /// Credits the full workout regardless of how many exercises actually
    /// ran: the workout's points, one workout, the sum of all exercise
    /// durations, and the flat calorie credit.
    pub fn complete(&mut self) -> Result<CompletionSummary> {
        if self.phase != SessionPhase::Running {
            return Err(Error::Session(format!(
                "Cannot complete a session in phase {:?}",
                self.phase
            )));
        }
        Ok(self.finalize())
    }

    /// Abandon the session. Valid from `Running` or `Paused`.
    ///
    /// Writes nothing: no partial credit, no ledger mutation.
    pub fn cancel(&mut self) -> Result<()> {
        match self.phase {
            SessionPhase::Running | SessionPhase::Paused => {
                self.phase = SessionPhase::Cancelled;
                self.time_remaining = 0;
                tracing::info!("Session cancelled: {}", self.workout.name);
                Ok(())
            }
            other => Err(Error::Session(format!(
                "Cannot cancel a session in phase {:?}",
                other
            ))),
        }
    }

    fn finalize(&mut self) -> CompletionSummary {
        let summary = self.ledger.credit_workout(
            self.workout.points,
            self.workout.total_seconds(),
            Utc::now().date_naive(),
        );
        self.phase = SessionPhase::Completed;
        self.time_remaining = 0;
        tracing::info!(
            "Session completed: {} (+{} points, total {})",
            self.workout.name,
            summary.points_earned,
            summary.total_points
        );
        summary
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The exercise the countdown is inside of, while one is active
    pub fn current_exercise(&self) -> Option<&Exercise> {
        if self.phase.is_terminal() {
            return None;
        }
        self.workout.exercises.get(self.current)
    }

    /// The exercise after the current one, if any
    pub fn next_exercise(&self) -> Option<&Exercise> {
        self.workout.exercises.get(self.current + 1)
    }

    pub fn quota(&self) -> &QuotaBook {
        &self.quota
    }

    pub fn ledger(&self) -> &ProgressLedger<S> {
        &self.ledger
    }

    /// Tear down the controller and hand the ledger back
    pub fn into_ledger(self) -> ProgressLedger<S> {
        self.ledger
    }
}
