//! Product business logic - Handles all product-related operations.
//!
//! This module provides functions for creating, retrieving, updating, and deleting
//! products, and for managing which categories a product is listed under. Deleting a
//! product keeps the order history: order lines that sold it lose their reference but
//! keep their prices.

use crate::{
    core::{clean_name, money},
    entities::{
        Category, OrderItem, Product, ProductCategory, category, order_item, product,
        product_category,
    },
    errors::{Error, Result},
};
use sea_orm::{
    ConnectionTrait, JoinType, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use tracing::{debug, info};

/// Retrieves all products, ordered alphabetically by name.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the products that can currently be ordered, ordered by name.
pub async fn get_available_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsAvailable.eq(true))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by exact name.
pub async fn get_product_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the products linked to a category, ordered by name.
pub async fn get_products_in_category(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<product::Model>> {
    Product::find()
        .join(JoinType::InnerJoin, product::Relation::ProductCategory.def())
        .filter(product_category::Column::CategoryId.eq(category_id))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the categories a product is linked to, ordered by name.
pub async fn get_product_categories(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<category::Model>> {
    Category::find()
        .join(JoinType::InnerJoin, category::Relation::ProductCategory.def())
        .filter(product_category::Column::ProductId.eq(product_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product, performing input validation.
///
/// The name is trimmed. New products are available by default.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or longer than 100 characters
/// - The price is negative or has more than two decimal places
/// - The database insert operation fails
pub async fn create_product(
    db: &DatabaseConnection,
    name: &str,
    description: Option<String>,
    image: String,
    price: Decimal,
) -> Result<product::Model> {
    let name = clean_name(name, "Product name")?;
    let price = money::validate_price(price)?;

    let product = product::ActiveModel {
        name: Set(name),
        description: Set(description),
        image: Set(image),
        price: Set(price),
        is_available: Set(true),
        ..Default::default()
    };
    let product = product.insert(db).await?;
    info!(product_id = product.id, price = %product.price, "Created {}", product);
    Ok(product)
}

async fn find_product<C>(db: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    get_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            id: product_id.to_string(),
        })
}

/// Changes the unit price of a product. Existing order lines keep the price they
/// were sold at.
pub async fn update_product_price(
    db: &DatabaseConnection,
    product_id: i64,
    new_price: Decimal,
) -> Result<product::Model> {
    let new_price = money::validate_price(new_price)?;

    let mut product: product::ActiveModel = find_product(db, product_id).await?.into();
    product.price = Set(new_price);
    product.update(db).await.map_err(Into::into)
}

/// Marks a product as orderable or not.
pub async fn set_product_availability(
    db: &DatabaseConnection,
    product_id: i64,
    is_available: bool,
) -> Result<product::Model> {
    let mut product: product::ActiveModel = find_product(db, product_id).await?.into();
    product.is_available = Set(is_available);
    let product = product.update(db).await?;
    debug!(product_id, is_available, "Product availability changed");
    Ok(product)
}

/// Replaces the set of categories a product is listed under.
///
/// # Errors
/// Returns an error if the product or any of the categories does not exist.
pub async fn set_product_categories(
    db: &DatabaseConnection,
    product_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    let txn = db.begin().await?;

    find_product(&txn, product_id).await?;
    for &category_id in category_ids {
        if Category::find_by_id(category_id).one(&txn).await?.is_none() {
            return Err(Error::CategoryNotFound {
                id: category_id.to_string(),
            });
        }
    }

    ProductCategory::delete_many()
        .filter(product_category::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;

    let mut unique_ids = category_ids.to_vec();
    unique_ids.sort_unstable();
    unique_ids.dedup();
    for category_id in unique_ids {
        product_category::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(category_id),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(())
}

/// Deletes a product. Order lines that sold it keep their prices but lose the
/// product reference.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let product = find_product(&txn, product_id).await?;

    let detached = OrderItem::update_many()
        .col_expr(
            order_item::Column::ProductId,
            Expr::value(Option::<i64>::None),
        )
        .filter(order_item::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    ProductCategory::delete_many()
        .filter(product_category::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    product.delete(&txn).await?;

    txn.commit().await?;
    info!(
        product_id,
        detached_order_items = detached.rows_affected,
        "Deleted product"
    );
    Ok(())
}
