//! Core business logic - framework-agnostic habit, progress, and statistics
//! operations. Pure rule sets live next to the async persistence functions
//! that apply them; nothing in here knows about a UI.

/// Account lifecycle: registration, sign-in, profile image, deletion cascade
pub mod account;
/// Date string conversion between the canonical ISO form and the display form
pub mod dates;
/// Wizard state accumulation for habit creation and editing
pub mod draft;
/// Habit persistence: list queries, upsert, archiving, progress updates
pub mod habit;
/// Points ledger and level derivation
pub mod points;
/// Pure progress/streak transition rules
pub mod progress;
/// Pure statistics aggregation for the charts
pub mod stats;
