//! Draft accumulator - wizard state for habit creation and editing.
//!
//! Holds one mutable habit-shaped draft across the three wizard steps
//! (identity, schedule, category) and merges each step's partial update
//! without losing fields set earlier. Nothing is persisted until the final
//! step commits; cancelling simply replaces the draft, and a failed commit
//! leaves the draft intact so the user can retry.

use crate::{
    core::habit as habit_ops,
    entities::habit::{self, Frequency, StringList},
    errors::Result,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use ulid::Ulid;

/// Default category assigned when the wizard never reaches step 3.
pub const DEFAULT_CATEGORY: &str = "General";

/// Returns a fresh not-yet-persisted habit with every field at its default.
#[must_use]
pub fn empty_habit() -> habit::Model {
    habit::Model {
        id: String::new(),
        user_id: String::new(),
        title: String::new(),
        description: String::new(),
        start_date: String::new(),
        frequency: Frequency::Daily,
        selected_days: StringList::default(),
        reminder_enabled: false,
        reminder_times: StringList::default(),
        is_repeat_enabled: false,
        repeat_interval_hours: 1,
        category: DEFAULT_CATEGORY.to_string(),
        progress: 0.0,
        streak: 0,
        completed_dates: StringList::default(),
        is_archived: false,
        // Placeholder, replaced at commit for new habits
        created_at: Utc::now(),
    }
}

/// Deduplicates and sorts reminder times ascending.
///
/// Callers normalize before handing times to [`HabitDraft::set_schedule`];
/// the accumulator itself stores exactly what it is given.
#[must_use]
pub fn normalize_reminder_times(times: &[String]) -> Vec<String> {
    let mut times = times.to_vec();
    times.sort();
    times.dedup();
    times
}

/// One in-progress habit under construction or edit.
#[derive(Debug, Clone)]
pub struct HabitDraft {
    draft: habit::Model,
}

impl Default for HabitDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitDraft {
    /// Creates an accumulator holding an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self {
            draft: empty_habit(),
        }
    }

    /// Read access to the current draft state.
    #[must_use]
    pub fn current(&self) -> &habit::Model {
        &self.draft
    }

    /// Resets the draft to defaults for a brand-new habit.
    pub fn start_new(&mut self) {
        self.draft = empty_habit();
    }

    /// Seeds the draft with a full copy of an existing habit for editing.
    /// Steps that follow overwrite only their own fields, so everything not
    /// touched by a step keeps the existing habit's value.
    pub fn start_edit(&mut self, existing: &habit::Model) {
        self.draft = existing.clone();
    }

    /// Step 1: overwrites title, description, and start date. Validation is a
    /// UI concern; the accumulator records what it is told.
    pub fn set_identity(&mut self, title: &str, description: &str, start_date: &str) {
        self.draft.title = title.to_string();
        self.draft.description = description.to_string();
        self.draft.start_date = start_date.to_string();
    }

    /// Step 2: overwrites the scheduling fields. `reminder_times` is expected
    /// to arrive already deduplicated and sorted (see
    /// [`normalize_reminder_times`]).
    pub fn set_schedule(
        &mut self,
        frequency: Frequency,
        days: Vec<String>,
        reminder_enabled: bool,
        reminder_times: Vec<String>,
        repeat_enabled: bool,
        repeat_interval_hours: i32,
    ) {
        self.draft.frequency = frequency;
        self.draft.selected_days = StringList(days);
        self.draft.reminder_enabled = reminder_enabled;
        self.draft.reminder_times = StringList(reminder_times);
        self.draft.is_repeat_enabled = repeat_enabled;
        self.draft.repeat_interval_hours = repeat_interval_hours;
    }

    /// Step 3: sets the category and commits the draft.
    ///
    /// A draft without an id gets a fresh ULID and `created_at` stamped at
    /// the commit instant; an edit keeps both. On success the draft resets to
    /// empty and the persisted habit is returned. On failure the draft is
    /// left exactly as it was, category included, so a retry re-commits the
    /// same state.
    pub async fn set_category_and_commit(
        &mut self,
        db: &DatabaseConnection,
        user_id: &str,
        category: &str,
    ) -> Result<habit::Model> {
        self.draft.category = category.to_string();

        let mut habit = self.draft.clone();
        habit.user_id = user_id.to_string();
        if habit.id.is_empty() {
            habit.id = Ulid::new().to_string();
            habit.created_at = Utc::now();
        }

        let saved = habit_ops::save_habit(db, &habit).await?;
        self.start_new();
        Ok(saved)
    }
}
