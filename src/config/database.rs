//! Database configuration module for `Habitude`.
//!
//! Handles `SQLite` database connection and table creation using `SeaORM`.
//! Table creation uses `Schema::create_table_from_entity` to generate SQL
//! from the entity definitions, so the database schema always matches the
//! Rust struct definitions without hand-written migrations.

use crate::entities::{Habit, UserAccount};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_table = schema
        .create_table_from_entity(UserAccount)
        .if_not_exists()
        .to_owned();
    let habit_table = schema
        .create_table_from_entity(Habit)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&habit_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{HabitModel, UserAccountModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist when querying them succeeds
        let _: Vec<UserAccountModel> = UserAccount::find().limit(1).all(&db).await?;
        let _: Vec<HabitModel> = Habit::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
