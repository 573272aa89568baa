//! Account lifecycle business logic.
//!
//! Registration, sign-in, profile image updates, and the ordered
//! account-deletion cascade. Validation failures are caught before any
//! backend call; identity and storage collaborators arrive by injection.

use crate::{
    auth::IdentityProvider,
    blob::BlobStore,
    core::{habit as habit_ops, points},
    entities::{UserAccount, user_account},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// Storage path of a user's profile image blob.
#[must_use]
pub fn profile_image_path(user_id: &str) -> String {
    format!("profile_images/{user_id}.jpg")
}

/// Validates sign-up input, creates the identity, then the account row.
///
/// The display name defaults to the local part of the email. Password
/// mismatch and empty fields are validation errors and never reach the
/// identity provider.
pub async fn register_user<I>(
    db: &DatabaseConnection,
    identity: &I,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<user_account::Model>
where
    I: IdentityProvider,
{
    if email.is_empty() || password.is_empty() {
        return Err(Error::Validation {
            message: "email and password must not be empty".to_string(),
        });
    }
    if password != confirm_password {
        return Err(Error::Validation {
            message: "passwords do not match".to_string(),
        });
    }

    let user_id = identity.sign_up(email, password).await?;
    let name = email.split('@').next().unwrap_or(email);

    let account = user_account::ActiveModel {
        id: Set(user_id),
        email: Set(email.to_string()),
        name: Set(name.to_string()),
        profile_image_url: Set(String::new()),
        total_points: Set(0),
        created_at: Set(chrono::Utc::now()),
    };

    account.insert(db).await.map_err(Into::into)
}

/// Authenticates against the identity provider and loads the account row.
pub async fn sign_in<I>(
    db: &DatabaseConnection,
    identity: &I,
    email: &str,
    password: &str,
) -> Result<user_account::Model>
where
    I: IdentityProvider,
{
    if email.is_empty() || password.is_empty() {
        return Err(Error::Validation {
            message: "email and password must not be empty".to_string(),
        });
    }

    let user_id = identity.sign_in(email, password).await?;

    UserAccount::find_by_id(&user_id)
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })
}

/// Uploads a new profile image and stores its URL on the account row.
pub async fn update_profile_image<B>(
    db: &DatabaseConnection,
    blobs: &B,
    user_id: &str,
    data: &[u8],
) -> Result<user_account::Model>
where
    B: BlobStore,
{
    let url = blobs.put_file(&profile_image_path(user_id), data).await?;
    points::set_profile_image_url(db, user_id, &url).await
}

/// Deletes an account in the mandated order: habit data and the account row
/// first (one transaction), then the profile image blob, then the identity.
///
/// A missing blob is tolerated - not every account uploaded an image. If the
/// identity deletion fails after the data is already gone, the failure is
/// reported as [`Error::IdentityDeletion`] so the caller can tell the user to
/// re-authenticate and retry that final step; the half-deleted state is
/// surfaced, never hidden.
pub async fn delete_account<I, B>(
    db: &DatabaseConnection,
    identity: &I,
    blobs: &B,
    user_id: &str,
) -> Result<()>
where
    I: IdentityProvider,
    B: BlobStore,
{
    let txn = db.begin().await?;
    let removed = habit_ops::delete_all_for_user(&txn, user_id).await?;
    UserAccount::delete_by_id(user_id).exec(&txn).await?;
    txn.commit().await?;
    info!("deleted account data for {user_id}: {removed} habits");

    if let Err(e) = blobs.delete(&profile_image_path(user_id)).await {
        warn!("profile image cleanup for {user_id} skipped: {e}");
    }

    identity
        .delete_identity()
        .await
        .map_err(|e| Error::IdentityDeletion {
            message: format!("{e}; re-authenticate and retry"),
        })?;

    Ok(())
}
