//! Habit entity - Represents one tracked behavior for one user.
//!
//! Each habit carries its schedule (frequency, weekday selection, reminder
//! times), its cycle state (progress, streak), and the append-only ledger of
//! calendar days it was completed on. Habits are soft-deleted via `is_archived`
//! and only hard-deleted when the owning account is removed.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// JSON-backed list of strings used for weekday selections, reminder times,
/// and the completed-dates ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

impl StringList {
    /// Whether the list contains the given value.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }
}

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

/// How often a habit repeats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Frequency {
    /// Due every day
    #[default]
    #[sea_orm(string_value = "daily")]
    Daily,
    /// Due on the weekdays named in `selected_days`
    #[sea_orm(string_value = "weekly")]
    Weekly,
}

/// Habit database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habits")]
pub struct Model {
    /// Document-style string id. An empty string means "not yet persisted";
    /// a ULID is assigned once, at first save, and never changes.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Id of the owning user account
    pub user_id: String,
    /// Short name of the habit (e.g., "Read", "Drink water")
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Calendar date the habit starts, ISO-8601 (`YYYY-MM-DD`)
    pub start_date: String,
    /// Daily or weekly cadence
    pub frequency: Frequency,
    /// Weekday names, meaningful only when `frequency` is `Weekly`
    pub selected_days: StringList,
    /// Whether reminders fire for this habit
    pub reminder_enabled: bool,
    /// Wall-clock reminder times (`HH:MM`), deduplicated and sorted ascending
    pub reminder_times: StringList,
    /// Whether the reminder re-fires periodically through the day
    pub is_repeat_enabled: bool,
    /// Re-reminder interval in hours, 1 through 12
    pub repeat_interval_hours: i32,
    /// Category name from the fixed palette (icon/color mapping is a UI concern)
    pub category: String,
    /// Completion progress for the current cycle, 0.0 through 1.0
    pub progress: f64,
    /// Count of consecutive completed cycles, never negative
    pub streak: i32,
    /// ISO dates on which the habit was marked complete, one per calendar day
    pub completed_dates: StringList,
    /// Soft delete flag - archived habits leave the active list but keep their history
    pub is_archived: bool,
    /// When the habit was first persisted, immutable once set
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Habit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each habit belongs to one user account
    #[sea_orm(
        belongs_to = "super::user_account::Entity",
        from = "Column::UserId",
        to = "super::user_account::Column::Id"
    )]
    UserAccount,
}

impl Related<super::user_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
