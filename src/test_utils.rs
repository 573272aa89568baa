//! Shared test utilities for `Habitude`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{draft, habit as habit_ops},
    entities::{habit, user_account},
    errors::Result,
};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use ulid::Ulid;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Inserts a test user account with zero points.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Account id, also used to derive the email and name
pub async fn create_test_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<user_account::Model> {
    let account = user_account::ActiveModel {
        id: Set(user_id.to_string()),
        email: Set(format!("{user_id}@example.com")),
        name: Set(user_id.to_string()),
        profile_image_url: Set(String::new()),
        total_points: Set(0),
        created_at: Set(chrono::Utc::now()),
    };
    account.insert(db).await.map_err(Into::into)
}

/// Builds an unsaved habit model with sensible defaults and a fresh id.
///
/// # Defaults
/// * `frequency`: Daily
/// * `category`: "General"
/// * `progress`: 0.0, `streak`: 0, empty ledger
#[must_use]
pub fn build_habit(user_id: &str, title: &str) -> habit::Model {
    let mut habit = draft::empty_habit();
    habit.id = Ulid::new().to_string();
    habit.user_id = user_id.to_string();
    habit.title = title.to_string();
    habit.start_date = "2024-01-01".to_string();
    habit
}

/// Builds and persists a test habit.
pub async fn create_test_habit(
    db: &DatabaseConnection,
    user_id: &str,
    title: &str,
) -> Result<habit::Model> {
    habit_ops::save_habit(db, &build_habit(user_id, title)).await
}

/// Sets up a complete test environment with a user and one habit.
/// Returns (db, habit) for common test scenarios.
pub async fn setup_with_habit() -> Result<(DatabaseConnection, habit::Model)> {
    let db = setup_test_db().await?;
    create_test_user(&db, "test_user").await?;
    let habit = create_test_habit(&db, "test_user", "Test Habit").await?;
    Ok((db, habit))
}
