//! Order entity - A customer ticket with a daily sequence number.
//!
//! Each order is numbered per calendar day, so `(order_number, order_date)` is unique.
//! The order owns its items and payments; its `total_price` is derived from the items
//! and its `status` is gated on full payment (see [`crate::core::order`]).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of an order
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, not yet fully paid
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid and being prepared
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Order finished
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl OrderStatus {
    /// Whether entering this status requires the order to be fully paid.
    #[must_use]
    pub const fn requires_full_payment(self) -> bool {
        matches!(self, Self::Processing | Self::Completed)
    }
}

/// How the customer is served
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    #[sea_orm(string_value = "take_away")]
    TakeAway,
    #[sea_orm(string_value = "eat_in")]
    EatIn,
}

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Daily order number, restarting at 1 every day
    pub order_number: i32,
    /// Calendar date the order was taken on (drives daily numbering)
    pub order_date: Date,
    /// When the order was created
    pub created_at: DateTimeUtc,
    /// Current status of the order
    pub status: OrderStatus,
    /// Take away or eat in, if known
    pub service_type: Option<ServiceType>,
    /// Sum of the line totals; unset until the first item is added
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub total_price: Option<Decimal>,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many line items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    /// One order has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
