//! User account entity - One row per authenticated user.
//!
//! Holds profile data and the cumulative points ledger. The primary key is
//! the opaque id handed out by the identity provider, so account rows and
//! identities pair one-to-one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_accounts")]
pub struct Model {
    /// Opaque user id assigned by the identity provider
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Sign-in email address
    pub email: String,
    /// Display name, defaults to the local part of the email when unset
    pub name: String,
    /// URL of the uploaded profile image, empty when none was uploaded
    pub profile_image_url: String,
    /// Cumulative point total. Not floored at zero: repeated
    /// complete/uncomplete toggling can drive it negative.
    pub total_points: i64,
    /// When the account row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `UserAccount` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user account has many habits
    #[sea_orm(has_many = "super::habit::Entity")]
    Habits,
}

impl Related<super::habit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Habits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
