//! Menu business logic - menus and their sized, priced variants.

use crate::{
    core::{clean_name, money},
    entities::{Menu, MenuVariant, OrderItem, menu, menu_variant, order_item},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Retrieves all menus, ordered alphabetically by name.
pub async fn get_all_menus(db: &DatabaseConnection) -> Result<Vec<menu::Model>> {
    Menu::find()
        .order_by_asc(menu::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific menu by its unique ID.
pub async fn get_menu_by_id(db: &DatabaseConnection, menu_id: i64) -> Result<Option<menu::Model>> {
    Menu::find_by_id(menu_id).one(db).await.map_err(Into::into)
}

/// Creates a new menu after validating its name.
pub async fn create_menu(
    db: &DatabaseConnection,
    name: &str,
    description: String,
) -> Result<menu::Model> {
    let name = clean_name(name, "Menu name")?;

    let menu = menu::ActiveModel {
        name: Set(name),
        description: Set(description),
        ..Default::default()
    };
    let menu = menu.insert(db).await?;
    info!(menu_id = menu.id, "Created {}", menu);
    Ok(menu)
}

/// Deletes a menu.
pub async fn delete_menu(db: &DatabaseConnection, menu_id: i64) -> Result<()> {
    let result = Menu::delete_by_id(menu_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::MenuNotFound {
            id: menu_id.to_string(),
        });
    }
    Ok(())
}

/// Retrieves a specific menu variant by its unique ID.
pub async fn get_menu_variant_by_id<C>(
    db: &C,
    variant_id: i64,
) -> Result<Option<menu_variant::Model>>
where
    C: ConnectionTrait,
{
    MenuVariant::find_by_id(variant_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the variants that can currently be ordered, cheapest first.
pub async fn get_available_menu_variants(
    db: &DatabaseConnection,
) -> Result<Vec<menu_variant::Model>> {
    MenuVariant::find()
        .filter(menu_variant::Column::IsAvailable.eq(true))
        .order_by_asc(menu_variant::Column::Price)
        .order_by_asc(menu_variant::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new menu variant. New variants are available by default.
///
/// # Errors
/// Returns an error if the size label is empty or too long, or the price is invalid.
pub async fn create_menu_variant(
    db: &DatabaseConnection,
    size: &str,
    price: Decimal,
    image: String,
) -> Result<menu_variant::Model> {
    let size = clean_name(size, "Menu variant size")?;
    let price = money::validate_price(price)?;

    let variant = menu_variant::ActiveModel {
        size: Set(size),
        price: Set(price),
        image: Set(image),
        is_available: Set(true),
        ..Default::default()
    };
    let variant = variant.insert(db).await?;
    info!(variant_id = variant.id, "Created menu variant {}", variant);
    Ok(variant)
}

async fn find_menu_variant<C>(db: &C, variant_id: i64) -> Result<menu_variant::Model>
where
    C: ConnectionTrait,
{
    get_menu_variant_by_id(db, variant_id)
        .await?
        .ok_or_else(|| Error::MenuVariantNotFound {
            id: variant_id.to_string(),
        })
}

/// Changes the price of a menu variant.
pub async fn update_menu_variant_price(
    db: &DatabaseConnection,
    variant_id: i64,
    new_price: Decimal,
) -> Result<menu_variant::Model> {
    let new_price = money::validate_price(new_price)?;

    let mut variant: menu_variant::ActiveModel = find_menu_variant(db, variant_id).await?.into();
    variant.price = Set(new_price);
    variant.update(db).await.map_err(Into::into)
}

/// Marks a menu variant as orderable or not.
pub async fn set_menu_variant_availability(
    db: &DatabaseConnection,
    variant_id: i64,
    is_available: bool,
) -> Result<menu_variant::Model> {
    let mut variant: menu_variant::ActiveModel = find_menu_variant(db, variant_id).await?.into();
    variant.is_available = Set(is_available);
    variant.update(db).await.map_err(Into::into)
}

/// Deletes a menu variant, clearing the reference on order lines that sold it.
pub async fn delete_menu_variant(db: &DatabaseConnection, variant_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let variant = find_menu_variant(&txn, variant_id).await?;
    OrderItem::update_many()
        .col_expr(
            order_item::Column::MenuVariantId,
            Expr::value(Option::<i64>::None),
        )
        .filter(order_item::Column::MenuVariantId.eq(variant_id))
        .exec(&txn)
        .await?;
    variant.delete(&txn).await?;

    txn.commit().await?;
    info!(variant_id, "Deleted menu variant");
    Ok(())
}
