//! Database configuration module for the point-of-sale backend.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs.
//! The one constraint the entities cannot express, the composite uniqueness of
//! `(order_number, order_date)`, is added as an explicit index.

use crate::entities::{
    Category, Menu, MenuVariant, Order, OrderItem, Payment, Product, ProductCategory, User, order,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/restaurant_pos.sqlite?mode=rwc";

/// Name of the unique index backing daily order numbering.
pub const ORDER_NUMBER_INDEX: &str = "idx_order_number_order_date";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

/// Creates all tables that do not exist yet, parents before children.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, ProductCategory).await?;
    create_table(db, &schema, Menu).await?;
    create_table(db, &schema, MenuVariant).await?;
    create_table(db, &schema, Order).await?;
    create_table(db, &schema, OrderItem).await?;
    create_table(db, &schema, Payment).await?;
    create_table(db, &schema, User).await?;

    let order_number_index = Index::create()
        .name(ORDER_NUMBER_INDEX)
        .table(Order)
        .col(order::Column::OrderNumber)
        .col(order::Column::OrderDate)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&order_number_index)).await?;

    info!("Database tables ensured");
    Ok(())
}
