//! Order item entity - One line of an order.
//!
//! A line references exactly one of a product or a menu variant. Its `total_price`
//! is always `unit_price * quantity` and is rewritten on every save.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_item")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Price charged per unit at the time of ordering
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
    /// Number of units, at least 1
    pub quantity: i32,
    /// `unit_price * quantity`
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub total_price: Option<Decimal>,
    /// Owning order
    pub order_id: i64,
    /// Product sold on this line, null if it was a menu variant or the product was deleted
    pub product_id: Option<i64>,
    /// Menu variant sold on this line, null if it was a product or the variant was deleted
    pub menu_variant_id: Option<i64>,
}

/// Defines relationships between `OrderItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one order and goes away with it
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "SetNull"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::menu_variant::Entity",
        from = "Column::MenuVariantId",
        to = "super::menu_variant::Column::Id",
        on_delete = "SetNull"
    )]
    MenuVariant,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::menu_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuVariant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Line total, treating a never-computed total as zero.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.total_price.unwrap_or_default()
    }
}
