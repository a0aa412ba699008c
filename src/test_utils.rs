//! Shared test utilities for the point-of-sale backend.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{category, menu, order, product},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Builds a money amount from a number of cents, e.g. `money(850)` is 8.50.
#[must_use]
pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Fixed business date used by tests that do not care about "today".
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default()
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test category with an empty description and image.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(db, name, String::new(), String::new()).await
}

/// Creates an available test product with the given price.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
) -> Result<entities::product::Model> {
    product::create_product(db, name, None, String::new(), price).await
}

/// Creates an available test menu variant with the given size and price.
pub async fn create_test_menu_variant(
    db: &DatabaseConnection,
    size: &str,
    price: Decimal,
) -> Result<entities::menu_variant::Model> {
    menu::create_menu_variant(db, size, price, String::new()).await
}

/// Creates a pending order on [`test_date`].
pub async fn create_test_order(db: &DatabaseConnection) -> Result<entities::order::Model> {
    order::create_order_on(db, test_date(), None).await
}

/// Sets up a complete test environment with an empty order and an 8.50 product.
/// Returns (db, order, product) for order workflow tests.
pub async fn setup_with_order_and_product() -> Result<(
    DatabaseConnection,
    entities::order::Model,
    entities::product::Model,
)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "Cheeseburger", money(850)).await?;
    let order = create_test_order(&db).await?;
    Ok((db, order, product))
}
