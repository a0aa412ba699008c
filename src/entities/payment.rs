//! Payment entity - Money received against an order.
//!
//! Payments for one order may be split across several modes, but their sum never
//! exceeds the order total.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a payment was made
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Payment by card
    #[sea_orm(string_value = "card")]
    Card,
    /// Payment by cash
    #[default]
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Payment by mobile money
    #[sea_orm(string_value = "mobile money")]
    MobileMoney,
}

/// Payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order this payment settles
    pub order_id: i64,
    /// When the payment was received
    pub date: DateTimeUtc,
    /// Amount received, two decimal places
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    /// Payment mode: card, cash or mobile money
    pub mode: PaymentMode,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one order and goes away with it
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
