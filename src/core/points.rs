//! Points ledger business logic.
//!
//! Tracks each user's cumulative point total and derives the level numbers
//! shown on the profile screen. The total carries no floor at zero:
//! completing a habit grants points, un-completing reclaims them, and
//! archiving a completed habit does not reverse its grants, so repeated
//! toggle-and-archive sequences can drive the total negative. That behavior
//! is preserved as-is.

use crate::{
    entities::{UserAccount, user_account},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Points span of a single level.
pub const POINTS_PER_LEVEL: i64 = 100;

/// Level for a given point total: one level per 100 points, starting at 1.
#[must_use]
pub fn level_for(total_points: i64) -> i64 {
    total_points / POINTS_PER_LEVEL + 1
}

/// Points still missing to reach the next level.
#[must_use]
pub fn points_to_next_level(total_points: i64) -> i64 {
    POINTS_PER_LEVEL - total_points % POINTS_PER_LEVEL
}

/// Retrieves a user account row by id.
pub async fn get_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<user_account::Model>> {
    UserAccount::find_by_id(user_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Atomically adds a delta to a user's point total.
///
/// Uses a single database-level `total_points = total_points + delta` update
/// instead of read-modify-write, so concurrent adjustments cannot lose
/// increments. Callable on a transaction connection: the progress update path
/// bundles the points adjustment with the streak write in one transaction so
/// neither effect can apply without the other.
///
/// # Arguments
/// * `db` - Database connection or transaction
/// * `user_id` - Account to adjust
/// * `delta` - Amount to add (negative to reclaim points)
///
/// # Returns
/// The updated user account model
pub async fn adjust_points<C>(db: &C, user_id: &str, delta: i64) -> Result<user_account::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    // Verify the account exists before touching it
    let _user = UserAccount::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })?;

    UserAccount::update_many()
        .col_expr(
            user_account::Column::TotalPoints,
            Expr::col(user_account::Column::TotalPoints).add(delta),
        )
        .filter(user_account::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    UserAccount::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })
}

/// Overwrites the stored profile image URL for a user.
pub async fn set_profile_image_url(
    db: &DatabaseConnection,
    user_id: &str,
    url: &str,
) -> Result<user_account::Model> {
    let user = UserAccount::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })?;

    let mut active: user_account::ActiveModel = user.into();
    active.profile_image_url = Set(url.to_string());
    active.update(db).await.map_err(Into::into)
}
