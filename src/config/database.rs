//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust models without hand-written SQL.

use crate::entities::{BudgetItem, BudgetItemOccurrence, Category, Movement, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// Users come first since every other table references them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut tables = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Movement),
        schema.create_table_from_entity(BudgetItem),
        schema.create_table_from_entity(BudgetItemOccurrence),
    ];

    for table in &mut tables {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    Ok(())
}
