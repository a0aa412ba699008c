//! Product entity - A single item sold à la carte (e.g. "Cheeseburger", "Coke").
//!
//! Products carry a unit price and an availability flag, and may belong to any number
//! of categories. Order items reference products weakly: deleting a product leaves
//! the order history intact with a null reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (at most 100 characters)
    pub name: String,
    /// Optional longer description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Path of the product picture, relative to the media root
    pub image: String,
    /// Unit price, two decimal places
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub price: Decimal,
    /// Whether the product can currently be ordered
    pub is_available: bool,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Links to categories through the junction table
    #[sea_orm(has_many = "super::product_category::Entity")]
    ProductCategory,
    /// Order lines that sold this product
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::product_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCategory.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_category::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product: {}", self.name)
    }
}
