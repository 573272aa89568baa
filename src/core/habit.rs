//! Habit persistence business logic - CRUD over the habit collection.
//!
//! Provides the authoritative operations behind the habit store: list queries
//! ordered newest first, idempotent upsert keyed by the string id, soft
//! archiving, and the progress update that bundles the streak write with the
//! matching points adjustment in one database transaction. All functions are
//! async and return Result types for error handling.

use crate::{
    core::{points, progress},
    entities::{Habit, habit},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Retrieves a user's active (non-archived) habits, newest `created_at` first.
///
/// This is the list every UI surface renders; archived habits are excluded
/// here but stay in the table for the statistics history.
pub async fn get_active_habits(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<habit::Model>> {
    Habit::find()
        .filter(habit::Column::UserId.eq(user_id))
        .filter(habit::Column::IsArchived.eq(false))
        .order_by_desc(habit::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all of a user's habits including archived ones, newest first.
pub async fn get_all_habits(db: &DatabaseConnection, user_id: &str) -> Result<Vec<habit::Model>> {
    Habit::find()
        .filter(habit::Column::UserId.eq(user_id))
        .order_by_desc(habit::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a habit by its unique id.
pub async fn get_habit_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<habit::Model>> {
    Habit::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Upserts a habit keyed by its id.
///
/// Inserts when the id is unknown, otherwise overwrites the mutable fields of
/// the stored row. Repeating a save with the same id never creates a second
/// row, so the call is safe against an in-flight subscription refresh. The id
/// must already be assigned: drafts generate one at commit, and saving an
/// empty-id model is a validation error. `created_at` and `user_id` of an
/// existing row are preserved.
pub async fn save_habit(db: &DatabaseConnection, habit: &habit::Model) -> Result<habit::Model> {
    if habit.id.is_empty() {
        return Err(Error::Validation {
            message: "habit id must be assigned before saving".to_string(),
        });
    }

    let existing = Habit::find_by_id(&habit.id).one(db).await?;

    match existing {
        Some(stored) => {
            let mut active: habit::ActiveModel = stored.into();
            active.title = Set(habit.title.clone());
            active.description = Set(habit.description.clone());
            active.start_date = Set(habit.start_date.clone());
            active.frequency = Set(habit.frequency);
            active.selected_days = Set(habit.selected_days.clone());
            active.reminder_enabled = Set(habit.reminder_enabled);
            active.reminder_times = Set(habit.reminder_times.clone());
            active.is_repeat_enabled = Set(habit.is_repeat_enabled);
            active.repeat_interval_hours = Set(habit.repeat_interval_hours);
            active.category = Set(habit.category.clone());
            active.progress = Set(habit.progress);
            active.streak = Set(habit.streak);
            active.completed_dates = Set(habit.completed_dates.clone());
            active.is_archived = Set(habit.is_archived);
            active.update(db).await.map_err(Into::into)
        }
        None => {
            let active = habit::ActiveModel {
                id: Set(habit.id.clone()),
                user_id: Set(habit.user_id.clone()),
                title: Set(habit.title.clone()),
                description: Set(habit.description.clone()),
                start_date: Set(habit.start_date.clone()),
                frequency: Set(habit.frequency),
                selected_days: Set(habit.selected_days.clone()),
                reminder_enabled: Set(habit.reminder_enabled),
                reminder_times: Set(habit.reminder_times.clone()),
                is_repeat_enabled: Set(habit.is_repeat_enabled),
                repeat_interval_hours: Set(habit.repeat_interval_hours),
                category: Set(habit.category.clone()),
                progress: Set(habit.progress),
                streak: Set(habit.streak),
                completed_dates: Set(habit.completed_dates.clone()),
                is_archived: Set(habit.is_archived),
                created_at: Set(habit.created_at),
            };
            active.insert(db).await.map_err(Into::into)
        }
    }
}

/// Soft-deletes a habit by setting its archive flag.
///
/// The row stays in the table so the completed-dates history keeps feeding
/// statistics; only the account-deletion path removes it for good.
pub async fn archive_habit(db: &DatabaseConnection, habit_id: &str) -> Result<habit::Model> {
    let stored = Habit::find_by_id(habit_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::HabitNotFound {
            id: habit_id.to_string(),
        })?;

    let mut active: habit::ActiveModel = stored.into();
    active.is_archived = Set(true);
    active.update(db).await.map_err(Into::into)
}

/// Applies a progress change and persists every effect of the transition.
///
/// Reads the stored row, runs the pure progress engine against it, then
/// writes `{progress, streak, completed_dates}` and the matching points
/// delta inside one database transaction. Either the streak write and the
/// points adjustment both land or neither does; a partial transition is
/// never observable.
///
/// # Arguments
/// * `db` - Database connection
/// * `habit_id` - Habit to update
/// * `new_progress` - Requested progress value (clamped by the engine)
/// * `today` - Calendar date attributed to the completion edge
///
/// # Returns
/// The updated habit model
pub async fn update_progress(
    db: &DatabaseConnection,
    habit_id: &str,
    new_progress: f64,
    today: NaiveDate,
) -> Result<habit::Model> {
    let txn = db.begin().await?;

    let stored = Habit::find_by_id(habit_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::HabitNotFound {
            id: habit_id.to_string(),
        })?;

    let update = progress::apply_progress(&stored, new_progress, today);
    let delta = progress::points_delta(
        progress::is_complete(stored.progress),
        progress::is_complete(update.progress),
    );

    let dates = progress::applied_dates(&stored.completed_dates, &update.dates_op);
    let user_id = stored.user_id.clone();

    let mut active: habit::ActiveModel = stored.into();
    active.progress = Set(update.progress);
    active.streak = Set(update.streak);
    active.completed_dates = Set(dates);
    let updated = active.update(&txn).await?;

    if delta != 0 {
        points::adjust_points(&txn, &user_id, delta).await?;
    }

    txn.commit().await?;

    Ok(updated)
}

/// Hard-deletes every habit belonging to a user.
///
/// Account-deletion path only; everywhere else archiving is the most a habit
/// can be removed.
pub async fn delete_all_for_user<C>(db: &C, user_id: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    Habit::delete_many()
        .filter(habit::Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map(|res| res.rows_affected)
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
    }

    #[tokio::test]
    async fn test_save_habit_requires_assigned_id() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "u1").await?;

        let mut habit = build_habit("u1", "Read");
        habit.id = String::new();

        let result = save_habit(&db, &habit).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_save_habit_is_idempotent_upsert() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "u1").await?;

        let habit = create_test_habit(&db, "u1", "Read").await?;

        // Saving again with a changed title updates in place, no duplicate
        let mut edited = habit.clone();
        edited.title = "Read more".to_string();
        let saved = save_habit(&db, &edited).await?;
        assert_eq!(saved.id, habit.id);
        assert_eq!(saved.title, "Read more");
        assert_eq!(saved.created_at, habit.created_at);

        let all = get_all_habits(&db, "u1").await?;
        assert_eq!(all.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_active_list_is_newest_first_and_skips_archived() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "u1").await?;

        let older = create_test_habit(&db, "u1", "Older").await?;
        let mut newer = build_habit("u1", "Newer");
        newer.created_at = older.created_at + chrono::Duration::seconds(5);
        let newer = save_habit(&db, &newer).await?;

        archive_habit(&db, &older.id).await?;

        let active = get_active_habits(&db, "u1").await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, newer.id);

        // The archived row still exists in the full history
        let all = get_all_habits(&db, "u1").await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, newer.id);
        assert!(all.iter().any(|h| h.id == older.id && h.is_archived));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_habit_by_id() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;

        let found = get_habit_by_id(&db, &habit.id).await?;
        assert_eq!(found.map(|h| h.id), Some(habit.id));

        assert!(get_habit_by_id(&db, "missing").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_archive_unknown_habit() -> Result<()> {
        let db = setup_test_db().await?;
        let result = archive_habit(&db, "missing").await;
        assert!(matches!(result, Err(Error::HabitNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_progress_completion_grants_points() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "u1").await?;
        let mut habit = build_habit("u1", "Read");
        habit.streak = 3;
        let habit = save_habit(&db, &habit).await?;

        let updated = update_progress(&db, &habit.id, 1.0, today()).await?;
        assert_eq!(updated.progress, 1.0);
        assert_eq!(updated.streak, 4);
        assert!(updated.completed_dates.contains("2024-02-15"));

        let user = points::get_user(&db, "u1").await?.unwrap();
        assert_eq!(user.total_points, 10);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_progress_uncompletion_reclaims_points() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "u1").await?;
        let habit = create_test_habit(&db, "u1", "Read").await?;

        update_progress(&db, &habit.id, 1.0, today()).await?;
        let reverted = update_progress(&db, &habit.id, 0.0, today()).await?;

        assert_eq!(reverted.progress, 0.0);
        assert_eq!(reverted.streak, 0);
        assert!(!reverted.completed_dates.contains("2024-02-15"));

        let user = points::get_user(&db, "u1").await?.unwrap();
        assert_eq!(user.total_points, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_progress_intermediate_changes_leave_ledger_alone() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "u1").await?;
        let habit = create_test_habit(&db, "u1", "Read").await?;

        let updated = update_progress(&db, &habit.id, 0.6, today()).await?;
        assert_eq!(updated.progress, 0.6);
        assert_eq!(updated.streak, 0);
        assert!(updated.completed_dates.0.is_empty());

        let user = points::get_user(&db, "u1").await?.unwrap();
        assert_eq!(user.total_points, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_progress_repeated_completion_is_a_noop() -> Result<()> {
        // Writing 1.0 while already complete must not inflate the streak,
        // duplicate the ledger entry, or grant points a second time.
        let db = setup_test_db().await?;
        create_test_user(&db, "u1").await?;
        let habit = create_test_habit(&db, "u1", "Read").await?;

        update_progress(&db, &habit.id, 1.0, today()).await?;
        let again = update_progress(&db, &habit.id, 1.0, today()).await?;

        assert_eq!(again.streak, 1);
        assert_eq!(again.completed_dates.0.len(), 1);

        let user = points::get_user(&db, "u1").await?.unwrap();
        assert_eq!(user.total_points, 10);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_all_for_user() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "u1").await?;
        create_test_user(&db, "u2").await?;
        create_test_habit(&db, "u1", "Read").await?;
        create_test_habit(&db, "u1", "Run").await?;
        create_test_habit(&db, "u2", "Swim").await?;

        let removed = delete_all_for_user(&db, "u1").await?;
        assert_eq!(removed, 2);

        assert!(get_all_habits(&db, "u1").await?.is_empty());
        assert_eq!(get_all_habits(&db, "u2").await?.len(), 1);

        Ok(())
    }
}
