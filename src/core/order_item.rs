//! Order item business logic - adding, changing and removing order lines.
//!
//! Every mutation recomputes the line total (`unit_price * quantity`) and then the
//! parent order's total, inside one transaction. If the order cannot accept the new
//! total (see [`crate::core::order::update_total_price`]) the whole change is rolled
//! back.

use crate::{
    core::{menu, money, order, product},
    entities::{OrderItem, order_item},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// A line to add to an order.
///
/// Exactly one of `product_id` and `menu_variant_id` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: Option<i64>,
    pub menu_variant_id: Option<i64>,
    /// Number of units, at least 1
    pub quantity: i32,
    /// Price per unit; the current catalog price is used when `None`
    pub unit_price: Option<Decimal>,
}

impl NewOrderItem {
    /// A line selling `quantity` units of a product at its catalog price.
    #[must_use]
    pub fn product(product_id: i64, quantity: i32) -> Self {
        Self {
            product_id: Some(product_id),
            quantity,
            ..Self::default()
        }
    }

    /// A line selling `quantity` units of a menu variant at its catalog price.
    #[must_use]
    pub fn menu_variant(menu_variant_id: i64, quantity: i32) -> Self {
        Self {
            menu_variant_id: Some(menu_variant_id),
            quantity,
            ..Self::default()
        }
    }

    /// Overrides the catalog price.
    #[must_use]
    pub const fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }
}

/// Checks that exactly one of a product and a menu variant is referenced.
pub fn validate_reference(
    product_id: Option<i64>,
    menu_variant_id: Option<i64>,
) -> Result<()> {
    match (product_id, menu_variant_id) {
        (None, None) => Err(Error::MissingLineItemReference),
        (Some(_), Some(_)) => Err(Error::AmbiguousLineItemReference),
        _ => Ok(()),
    }
}

fn validate_quantity(quantity: i32) -> Result<i32> {
    if quantity < 1 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(quantity)
}

/// Retrieves the lines of an order in the order they were added.
pub async fn get_order_items<C>(db: &C, order_id: i64) -> Result<Vec<order_item::Model>>
where
    C: ConnectionTrait,
{
    OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Resolves the catalog price of the referenced product or variant, checking that it
/// exists and can be ordered.
async fn catalog_price<C>(db: &C, item: &NewOrderItem) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    if let Some(product_id) = item.product_id {
        let product = product::get_product_by_id(db, product_id)
            .await?
            .ok_or_else(|| Error::ProductNotFound {
                id: product_id.to_string(),
            })?;
        if !product.is_available {
            return Err(Error::ItemUnavailable {
                name: product.name,
            });
        }
        return Ok(product.price);
    }

    let variant_id = item
        .menu_variant_id
        .ok_or(Error::MissingLineItemReference)?;
    let variant = menu::get_menu_variant_by_id(db, variant_id)
        .await?
        .ok_or_else(|| Error::MenuVariantNotFound {
            id: variant_id.to_string(),
        })?;
    if !variant.is_available {
        return Err(Error::ItemUnavailable {
            name: variant.to_string(),
        });
    }
    Ok(variant.price)
}

/// Adds a line to an order and recomputes the order total.
///
/// # Errors
/// Returns an error if:
/// - Neither or both of product and menu variant are set
/// - The quantity is below 1 or the unit price is invalid
/// - The order, product or variant does not exist, or the item is unavailable
/// - The order is processing or completed and would no longer be fully paid
#[instrument(skip(db))]
pub async fn add_order_item(
    db: &DatabaseConnection,
    order_id: i64,
    item: NewOrderItem,
) -> Result<order_item::Model> {
    validate_reference(item.product_id, item.menu_variant_id)?;
    let quantity = validate_quantity(item.quantity)?;
    let explicit_price = item.unit_price.map(money::validate_unit_price).transpose()?;

    let txn = db.begin().await?;

    let order = order::find_order(&txn, order_id).await?;
    let catalog_price = catalog_price(&txn, &item).await?;
    let unit_price = explicit_price.unwrap_or(catalog_price);
    let total_price = money::line_total(unit_price, quantity)?;

    let line = order_item::ActiveModel {
        order_id: Set(order_id),
        product_id: Set(item.product_id),
        menu_variant_id: Set(item.menu_variant_id),
        unit_price: Set(unit_price),
        quantity: Set(quantity),
        total_price: Set(Some(total_price)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let order = order::update_total_price(&txn, order).await?;

    txn.commit().await?;
    info!(
        order_id,
        item_id = line.id,
        order_total = ?order.total_price,
        "Added {} x {} to order",
        quantity,
        unit_price
    );
    Ok(line)
}

/// Changes the quantity of a line and recomputes the line and order totals.
#[instrument(skip(db))]
pub async fn update_order_item_quantity(
    db: &DatabaseConnection,
    item_id: i64,
    quantity: i32,
) -> Result<order_item::Model> {
    let quantity = validate_quantity(quantity)?;

    let txn = db.begin().await?;

    let line = find_order_item(&txn, item_id).await?;
    validate_reference(line.product_id, line.menu_variant_id)?;

    let order_id = line.order_id;
    let unit_price = line.unit_price;
    let mut active: order_item::ActiveModel = line.into();
    active.quantity = Set(quantity);
    active.total_price = Set(Some(money::line_total(unit_price, quantity)?));
    let line = active.update(&txn).await?;

    let order = order::find_order(&txn, order_id).await?;
    order::update_total_price(&txn, order).await?;

    txn.commit().await?;
    Ok(line)
}

/// Removes a line from its order and recomputes the order total.
#[instrument(skip(db))]
pub async fn remove_order_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let line = find_order_item(&txn, item_id).await?;
    let order_id = line.order_id;
    line.delete(&txn).await?;

    let order = order::find_order(&txn, order_id).await?;
    order::update_total_price(&txn, order).await?;

    txn.commit().await?;
    info!(order_id, item_id, "Removed order item");
    Ok(())
}

async fn find_order_item<C>(db: &C, item_id: i64) -> Result<order_item::Model>
where
    C: ConnectionTrait,
{
    OrderItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::OrderItemNotFound {
            id: item_id.to_string(),
        })
}
