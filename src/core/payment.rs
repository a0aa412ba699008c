//! Payment business logic - taking payments against an order.
//!
//! A payment is rejected if it would take the amount paid past the order total.
//! Recording the payment and the follow-up status update share a transaction, so an
//! order is moved to processing exactly when its last payment lands.

use crate::{
    core::{money, order},
    entities::{Payment, payment, payment::PaymentMode},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Retrieves the payments of an order, oldest first.
pub async fn get_payments<C>(db: &C, order_id: i64) -> Result<Vec<payment::Model>>
where
    C: ConnectionTrait,
{
    Payment::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .order_by_asc(payment::Column::Date)
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records a payment and moves the order to processing if it is now fully paid.
///
/// # Errors
/// Returns an error if:
/// - The amount is not positive, has more than two decimal places or more than ten digits
/// - The order does not exist
/// - Payments would exceed the order total ([`Error::PaymentExceedsTotal`])
#[instrument(skip(db))]
pub async fn add_payment(
    db: &DatabaseConnection,
    order_id: i64,
    amount: Decimal,
    mode: PaymentMode,
) -> Result<payment::Model> {
    let amount = money::validate_payment_amount(amount)?;

    let txn = db.begin().await?;

    let order = order::find_order(&txn, order_id).await?;
    let paid = order::amount_paid(&txn, order_id).await?;
    let total = order::order_total(&order);
    let new_paid = paid
        .checked_add(amount)
        .ok_or(Error::InvalidAmount { amount })?;
    if new_paid > total {
        return Err(Error::PaymentExceedsTotal {
            excess: new_paid - total,
        });
    }

    let payment = payment::ActiveModel {
        order_id: Set(order_id),
        date: Set(Utc::now()),
        amount: Set(amount),
        mode: Set(mode),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let order = order::update_status(&txn, order).await?;

    txn.commit().await?;
    info!(
        order_id,
        payment_id = payment.id,
        status = ?order.status,
        "Received {} by {:?}",
        amount,
        mode
    );
    Ok(payment)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::order::{amount_paid, find_order};
    use crate::core::order_item::{NewOrderItem, add_order_item};
    use crate::entities::order::OrderStatus;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_add_payment_amount_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = add_payment(&db, 1, Decimal::ZERO, PaymentMode::Cash).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));

        let result = add_payment(&db, 1, money(-500), PaymentMode::Card).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));

        let result = add_payment(
            &db,
            1,
            Decimal::new(12_345_678_901_234_567, 2),
            PaymentMode::Card,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));

        let result = add_payment(&db, 1, Decimal::MAX, PaymentMode::Cash).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_split_payment_moves_order_to_processing() -> Result<()> {
        let (db, order, product) = setup_with_order_and_product().await?;
        add_order_item(&db, order.id, NewOrderItem::product(product.id, 2)).await?;

        add_payment(&db, order.id, money(1000), PaymentMode::Cash).await?;
        assert_eq!(
            find_order(&db, order.id).await?.status,
            OrderStatus::Pending
        );

        add_payment(&db, order.id, money(700), PaymentMode::MobileMoney).await?;
        let order = find_order(&db, order.id).await?;
        assert_eq!(order.status, OrderStatus::Processing);

        let payments = get_payments(&db, order.id).await?;
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].mode, PaymentMode::Cash);
        assert_eq!(payments[1].mode, PaymentMode::MobileMoney);
        assert_eq!(amount_paid(&db, order.id).await?, money(1700));

        Ok(())
    }

    #[tokio::test]
    async fn test_overpayment_rejected() -> Result<()> {
        let (db, order, product) = setup_with_order_and_product().await?;
        add_order_item(&db, order.id, NewOrderItem::product(product.id, 1)).await?;
        add_payment(&db, order.id, money(500), PaymentMode::Cash).await?;

        let result = add_payment(&db, order.id, money(400), PaymentMode::Cash).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::PaymentExceedsTotal { excess } if excess == money(50)
        ));

        // The rejected payment was not recorded
        assert_eq!(amount_paid(&db, order.id).await?, money(500));
        assert_eq!(
            find_order(&db, order.id).await?.status,
            OrderStatus::Pending
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_payment_on_order_without_items_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;

        let result = add_payment(&db, order.id, money(100), PaymentMode::Card).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::PaymentExceedsTotal { excess: _ }
        ));

        let result = add_payment(&db, 999, money(100), PaymentMode::Card).await;
        assert!(matches!(result.unwrap_err(), Error::OrderNotFound { id: _ }));

        Ok(())
    }

    #[test]
    fn test_excess_error_message() {
        let error = Error::PaymentExceedsTotal { excess: money(50) };
        assert_eq!(
            error.to_string(),
            "Total payment exceeds the order total by 0.50."
        );
    }
}
