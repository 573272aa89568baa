//! Progress/streak engine - pure rules for the completion toggle.
//!
//! Maps a progress-value change onto the streak counter, the points ledger,
//! and the completed-dates history. Only the completion edge matters: crossing
//! 1.0 in either direction moves streak and history, every intermediate change
//! leaves both untouched. This prevents streak inflation from repeated slider
//! toggling within one day. All functions here are synchronous and free of
//! I/O; persisting the result is the caller's job.

use crate::entities::habit;
use chrono::NaiveDate;

/// Points granted when a habit crosses into completion, and reclaimed when it
/// crosses back out.
pub const COMPLETION_POINTS: i64 = 10;

/// Mutation to apply to a habit's completed-dates ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletedDatesOp {
    /// Record the given ISO date as completed
    Add(String),
    /// Remove the given ISO date from the ledger
    Remove(String),
    /// Leave the ledger untouched
    None,
}

/// Result of applying a progress change: the value to store verbatim, the new
/// streak, and the ledger mutation that belongs to the same transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// New progress value, clamped to `[0, 1]`
    pub progress: f64,
    /// New streak count, floored at zero
    pub streak: i32,
    /// Companion completed-dates mutation
    pub dates_op: CompletedDatesOp,
}

/// Clamps a raw progress value into `[0, 1]`, mapping non-finite input to 0.
fn clamp_progress(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Whether a progress value counts as a completed cycle.
#[must_use]
pub fn is_complete(progress: f64) -> bool {
    progress >= 1.0
}

/// Applies a progress change to a habit and returns the resulting state.
///
/// The transition table is driven solely by the `(was_complete, is_complete)`
/// pair: entering completion increments the streak and records `today` in the
/// ledger, leaving completion decrements the streak (floored at zero) and
/// removes `today`, and everything else is a plain progress write. Out-of-range
/// input is clamped rather than rejected.
///
/// # Arguments
/// * `habit` - Current habit state (only `progress` and `streak` are read)
/// * `new_progress` - Requested progress value
/// * `today` - Reference date used for the ledger entry
#[must_use]
pub fn apply_progress(habit: &habit::Model, new_progress: f64, today: NaiveDate) -> ProgressUpdate {
    let new_progress = clamp_progress(new_progress);
    let was_complete = is_complete(habit.progress);
    let now_complete = is_complete(new_progress);
    let today_str = today.format("%Y-%m-%d").to_string();

    let (streak, dates_op) = match (was_complete, now_complete) {
        (false, true) => (habit.streak + 1, CompletedDatesOp::Add(today_str)),
        (true, false) => ((habit.streak - 1).max(0), CompletedDatesOp::Remove(today_str)),
        _ => (habit.streak, CompletedDatesOp::None),
    };

    ProgressUpdate {
        progress: new_progress,
        streak,
        dates_op,
    }
}

/// Points delta companion to [`apply_progress`]: +10 on entering completion,
/// -10 on leaving it, 0 otherwise. Both effects belong to one logical
/// transition and must be persisted by the same caller invocation.
#[must_use]
pub fn points_delta(was_complete: bool, now_complete: bool) -> i64 {
    match (was_complete, now_complete) {
        (false, true) => COMPLETION_POINTS,
        (true, false) => -COMPLETION_POINTS,
        _ => 0,
    }
}

/// Materializes a [`CompletedDatesOp`] against an existing ledger.
///
/// Adding is idempotent (a date already present is not duplicated) and
/// removing a missing date is a no-op, so replaying an op never corrupts the
/// ledger.
#[must_use]
pub fn applied_dates(existing: &habit::StringList, op: &CompletedDatesOp) -> habit::StringList {
    let mut dates = existing.0.clone();
    match op {
        CompletedDatesOp::Add(date) => {
            if !dates.iter().any(|d| d == date) {
                dates.push(date.clone());
            }
        }
        CompletedDatesOp::Remove(date) => dates.retain(|d| d != date),
        CompletedDatesOp::None => {}
    }
    habit::StringList(dates)
}

/// Snaps a single circular-slider gesture sample.
///
/// Dragging past the 0/1 seam registers as a huge jump in raw value; when the
/// sample moves more than 0.5 away from the current progress, the gesture is
/// treated as a wrap-around and snapped to whichever endpoint the current
/// value is closer to. Smaller moves pass through (clamped).
#[must_use]
pub fn snap_gesture(current: f64, raw: f64) -> f64 {
    let raw = clamp_progress(raw);
    if (raw - current).abs() > 0.5 {
        if current > 0.5 { 1.0 } else { 0.0 }
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::habit::StringList;

    fn habit_with(progress: f64, streak: i32, completed: &[&str]) -> habit::Model {
        habit::Model {
            id: "h1".to_string(),
            user_id: "u1".to_string(),
            title: "Read".to_string(),
            description: String::new(),
            start_date: "2024-01-01".to_string(),
            frequency: habit::Frequency::Daily,
            selected_days: StringList::default(),
            reminder_enabled: false,
            reminder_times: StringList::default(),
            is_repeat_enabled: false,
            repeat_interval_hours: 1,
            category: "General".to_string(),
            progress,
            streak,
            completed_dates: StringList(completed.iter().map(ToString::to_string).collect()),
            is_archived: false,
            created_at: chrono::Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
    }

    #[test]
    fn test_completing_increments_streak_and_records_today() {
        // Scenario: progress 0, streak 3, empty ledger -> full completion
        let habit = habit_with(0.0, 3, &[]);
        let update = apply_progress(&habit, 1.0, today());

        assert_eq!(update.progress, 1.0);
        assert_eq!(update.streak, 4);
        assert_eq!(
            update.dates_op,
            CompletedDatesOp::Add("2024-02-15".to_string())
        );

        let dates = applied_dates(&habit.completed_dates, &update.dates_op);
        assert_eq!(dates.0, vec!["2024-02-15".to_string()]);
    }

    #[test]
    fn test_uncompleting_decrements_streak_and_removes_today() {
        let habit = habit_with(1.0, 4, &["2024-02-15"]);
        let update = apply_progress(&habit, 0.0, today());

        assert_eq!(update.progress, 0.0);
        assert_eq!(update.streak, 3);
        assert_eq!(
            update.dates_op,
            CompletedDatesOp::Remove("2024-02-15".to_string())
        );

        let dates = applied_dates(&habit.completed_dates, &update.dates_op);
        assert!(dates.0.is_empty());
    }

    #[test]
    fn test_round_trip_from_zero_streak_floors_at_zero() {
        // Complete then uncomplete within the same day starting from streak 0
        let habit = habit_with(0.0, 0, &[]);
        let up = apply_progress(&habit, 1.0, today());
        assert_eq!(up.streak, 1);

        let mut completed = habit_with(up.progress, up.streak, &[]);
        completed.completed_dates = applied_dates(&habit.completed_dates, &up.dates_op);

        let down = apply_progress(&completed, 0.0, today());
        assert_eq!(down.streak, 0);

        // A second uncomplete attempt must not go negative
        let mut reset = completed.clone();
        reset.progress = 1.0;
        reset.streak = 0;
        let down_again = apply_progress(&reset, 0.0, today());
        assert_eq!(down_again.streak, 0);
    }

    #[test]
    fn test_intermediate_changes_touch_nothing() {
        let habit = habit_with(0.2, 5, &["2024-02-10"]);
        for target in [0.0, 0.3, 0.5, 0.99] {
            let update = apply_progress(&habit, target, today());
            assert_eq!(update.progress, target);
            assert_eq!(update.streak, 5);
            assert_eq!(update.dates_op, CompletedDatesOp::None);
        }
    }

    #[test]
    fn test_no_change_apply_is_idempotent() {
        // Re-applying the current progress yields zero deltas, complete or not
        for (progress, streak) in [(0.0, 0), (0.4, 2), (1.0, 7)] {
            let habit = habit_with(progress, streak, &[]);
            let update = apply_progress(&habit, progress, today());
            assert_eq!(update.streak, streak);
            assert_eq!(update.dates_op, CompletedDatesOp::None);
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        let habit = habit_with(0.0, 0, &[]);

        let over = apply_progress(&habit, 3.5, today());
        assert_eq!(over.progress, 1.0);
        assert_eq!(over.streak, 1);

        let under = apply_progress(&habit, -2.0, today());
        assert_eq!(under.progress, 0.0);
        assert_eq!(under.dates_op, CompletedDatesOp::None);

        let nan = apply_progress(&habit, f64::NAN, today());
        assert_eq!(nan.progress, 0.0);
    }

    #[test]
    fn test_points_delta_follows_completion_edge() {
        assert_eq!(points_delta(false, true), 10);
        assert_eq!(points_delta(true, false), -10);
        assert_eq!(points_delta(false, false), 0);
        assert_eq!(points_delta(true, true), 0);
    }

    #[test]
    fn test_applied_dates_add_is_idempotent() {
        let existing = StringList(vec!["2024-02-15".to_string()]);
        let op = CompletedDatesOp::Add("2024-02-15".to_string());
        let dates = applied_dates(&existing, &op);
        assert_eq!(dates.0.len(), 1);
    }

    #[test]
    fn test_applied_dates_remove_missing_is_noop() {
        let existing = StringList(vec!["2024-02-10".to_string()]);
        let op = CompletedDatesOp::Remove("2024-02-15".to_string());
        let dates = applied_dates(&existing, &op);
        assert_eq!(dates.0, vec!["2024-02-10".to_string()]);
    }

    #[test]
    fn test_snap_gesture_wraps_to_nearest_endpoint() {
        // Dragging from near-1.0 past the seam lands near 0: snap back to 1.0
        assert_eq!(snap_gesture(0.95, 0.05), 1.0);
        // Dragging from near-0 past the seam lands near 1: snap back to 0.0
        assert_eq!(snap_gesture(0.05, 0.95), 0.0);
        // Ordinary moves pass through
        assert_eq!(snap_gesture(0.4, 0.6), 0.6);
        assert_eq!(snap_gesture(0.9, 0.5), 0.5);
    }
}
