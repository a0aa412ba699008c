//! Category business logic - create, look up, update and delete menu categories.

use crate::{
    core::clean_name,
    entities::{Category, ProductCategory, category, product_category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Retrieves all categories, ordered alphabetically by name.
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific category by its unique ID.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new category after validating its name.
///
/// # Errors
/// Returns an error if the name is empty or longer than 100 characters, or if the
/// insert fails.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    description: String,
    image: String,
) -> Result<category::Model> {
    let name = clean_name(name, "Category name")?;

    let category = category::ActiveModel {
        name: Set(name),
        description: Set(description),
        image: Set(image),
        ..Default::default()
    };
    let category = category.insert(db).await?;
    info!(category_id = category.id, "Created {}", category);
    Ok(category)
}

/// Updates the name and description of an existing category.
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    name: &str,
    description: String,
) -> Result<category::Model> {
    let name = clean_name(name, "Category name")?;

    let mut category: category::ActiveModel = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            id: category_id.to_string(),
        })?
        .into();

    category.name = Set(name);
    category.description = Set(description);
    category.update(db).await.map_err(Into::into)
}

/// Deletes a category and unlinks it from its products. The products themselves stay.
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let category = Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            id: category_id.to_string(),
        })?;

    ProductCategory::delete_many()
        .filter(product_category::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?;
    category.delete(&txn).await?;

    txn.commit().await?;
    info!(category_id, "Deleted category");
    Ok(())
}
