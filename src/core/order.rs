//! Order business logic - daily numbering, total reconciliation and the status gate.
//!
//! An order's `total_price` is always derived from its items and its `status` can only
//! move past pending once the payments add up to exactly that total. The functions that
//! run as part of a larger write (`update_total_price`, `update_status`, ...) are generic
//! over [`ConnectionTrait`] so they can be called inside the caller's transaction.

use crate::{
    core::money,
    entities::{
        Order, OrderItem, Payment, order,
        order::{OrderStatus, ServiceType},
        order_item, payment,
    },
    errors::{Error, Result},
};
use chrono::{Local, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Retrieves a specific order by its unique ID.
pub async fn get_order_by_id<C>(db: &C, order_id: i64) -> Result<Option<order::Model>>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// Looks up an order by its daily number.
pub async fn get_order_by_number(
    db: &DatabaseConnection,
    order_date: NaiveDate,
    order_number: i32,
) -> Result<Option<order::Model>> {
    Order::find()
        .filter(order::Column::OrderDate.eq(order_date))
        .filter(order::Column::OrderNumber.eq(order_number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all orders taken on a date, in order-number order.
pub async fn get_orders_for_date<C>(db: &C, order_date: NaiveDate) -> Result<Vec<order::Model>>
where
    C: ConnectionTrait,
{
    Order::find()
        .filter(order::Column::OrderDate.eq(order_date))
        .order_by_asc(order::Column::OrderNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

pub(crate) async fn find_order<C>(db: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    get_order_by_id(db, order_id)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            id: order_id.to_string(),
        })
}

/// Highest order number already handed out on `order_date`, if any.
pub async fn last_order_number<C>(db: &C, order_date: NaiveDate) -> Result<Option<i32>>
where
    C: ConnectionTrait,
{
    let last = Order::find()
        .filter(order::Column::OrderDate.eq(order_date))
        .order_by_desc(order::Column::OrderNumber)
        .one(db)
        .await?;
    Ok(last.map(|order| order.order_number))
}

/// Creates a pending order dated today (local time).
pub async fn create_order(
    db: &DatabaseConnection,
    service_type: Option<ServiceType>,
) -> Result<order::Model> {
    create_order_on(db, Local::now().date_naive(), service_type).await
}

/// Creates a pending order on `order_date` with the next daily order number.
///
/// The number lookup and the insert share a transaction. On a backend with several
/// writers two concurrent creations can still pick the same number; the loser fails
/// with [`Error::DuplicateOrderNumber`] and is not retried.
#[instrument(skip(db))]
pub async fn create_order_on(
    db: &DatabaseConnection,
    order_date: NaiveDate,
    service_type: Option<ServiceType>,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let order_number = last_order_number(&txn, order_date).await?.unwrap_or(0) + 1;

    let order = order::ActiveModel {
        order_number: Set(order_number),
        order_date: Set(order_date),
        created_at: Set(Utc::now()),
        status: Set(OrderStatus::Pending),
        service_type: Set(service_type),
        total_price: Set(None),
        ..Default::default()
    };
    let order = order.insert(&txn).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateOrderNumber {
            order_number,
            order_date,
        },
        _ => e.into(),
    })?;

    txn.commit().await?;
    info!(
        order_id = order.id,
        order_number, "Created order #{} for {}", order_number, order_date
    );
    Ok(order)
}

/// Sum of the line totals of an order's items, zero when it has none.
pub async fn items_total<C>(db: &C, order_id: i64) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .all(db)
        .await?;
    money::sum(items.iter().map(order_item::Model::line_total))
}

/// Sum of the payments recorded against an order, zero when there are none.
pub async fn amount_paid<C>(db: &C, order_id: i64) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let payments = Payment::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .all(db)
        .await?;
    money::sum(payments.iter().map(|p| p.amount))
}

/// The order total, treating an unset total as zero.
#[must_use]
pub fn order_total(order: &order::Model) -> Decimal {
    money::normalize(order.total_price.unwrap_or_default())
}

/// Whether the payments add up to exactly the order total.
///
/// There is no tolerance: an underpaid order is not fully paid, and neither would an
/// overpaid one be (overpayment is rejected when the payment is taken).
pub async fn is_fully_paid<C>(db: &C, order: &order::Model) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(amount_paid(db, order.id).await? == order_total(order))
}

/// What the customer still owes. Never negative while the payment invariant holds.
pub async fn balance_due<C>(db: &C, order: &order::Model) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    Ok(order_total(order) - amount_paid(db, order.id).await?)
}

/// Checks that `order` may be saved with `total` as its total.
///
/// The total can never drop below what has been paid, and a processing or completed
/// order must stay fully paid.
async fn check_saveable<C>(db: &C, order: &order::Model, total: Decimal) -> Result<()>
where
    C: ConnectionTrait,
{
    let paid = amount_paid(db, order.id).await?;
    if paid > total {
        return Err(Error::TotalBelowPaid { total, paid });
    }
    if order.status.requires_full_payment() && paid != total {
        return Err(Error::NotFullyPaid);
    }
    Ok(())
}

/// Recomputes the order total from its items and saves it if it changed.
///
/// # Errors
/// Fails with [`Error::InvalidAmount`] if the total has more than ten digits.
/// Fails with [`Error::TotalBelowPaid`] if the new total is less than what was already
/// paid, and with [`Error::NotFullyPaid`] if the order is processing or completed and the
/// new total no longer matches its payments.
pub async fn update_total_price<C>(db: &C, order: order::Model) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    let total = money::validate_amount(items_total(db, order.id).await?)?;
    if order.total_price == Some(total) {
        return Ok(order);
    }

    check_saveable(db, &order, total).await?;

    debug!(order_id = order.id, old = ?order.total_price, new = %total, "Order total changed");
    let mut active: order::ActiveModel = order.into();
    active.total_price = Set(Some(total));
    active.update(db).await.map_err(Into::into)
}

/// Moves a pending order to processing once it is fully paid. Other orders are
/// returned unchanged.
pub async fn update_status<C>(db: &C, order: order::Model) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    if order.status != OrderStatus::Pending || !is_fully_paid(db, &order).await? {
        return Ok(order);
    }

    info!(order_id = order.id, "Order fully paid, moving to processing");
    let mut active: order::ActiveModel = order.into();
    active.status = Set(OrderStatus::Processing);
    active.update(db).await.map_err(Into::into)
}

/// Sets the status of an order.
///
/// Any status may be set directly, but processing and completed require the order to
/// be fully paid.
#[instrument(skip(db))]
pub async fn set_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    status: OrderStatus,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let order = find_order(&txn, order_id).await?;
    if order.status == status {
        return Ok(order);
    }
    if status.requires_full_payment() && !is_fully_paid(&txn, &order).await? {
        return Err(Error::NotFullyPaid);
    }

    let mut active: order::ActiveModel = order.into();
    active.status = Set(status);
    let order = active.update(&txn).await?;

    txn.commit().await?;
    info!(order_id, status = ?order.status, "Order status changed");
    Ok(order)
}

/// Records whether the order is taken away or eaten in.
#[instrument(skip(db))]
pub async fn set_service_type(
    db: &DatabaseConnection,
    order_id: i64,
    service_type: Option<ServiceType>,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let mut active: order::ActiveModel = find_order(&txn, order_id).await?.into();
    active.service_type = Set(service_type);
    let order = active.update(&txn).await?;

    txn.commit().await?;
    Ok(order)
}

/// Deletes an order together with its items and payments.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let order = find_order(&txn, order_id).await?;
    OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    Payment::delete_many()
        .filter(payment::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    order.delete(&txn).await?;

    txn.commit().await?;
    info!(order_id, "Deleted order");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::order_item::{NewOrderItem, add_order_item};
    use crate::core::payment::add_payment;
    use crate::entities::payment::PaymentMode;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn mock_order(total_price: Option<Decimal>, status: OrderStatus) -> order::Model {
        order::Model {
            id: 1,
            order_number: 1,
            order_date: test_date(),
            created_at: Utc::now(),
            status,
            service_type: None,
            total_price,
        }
    }

    #[tokio::test]
    async fn test_set_status_requires_full_payment_mock() -> Result<()> {
        // Order of 20.00 with no payments
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![mock_order(Some(money(2000)), OrderStatus::Pending)]])
            .append_query_results([Vec::<payment::Model>::new()])
            .into_connection();

        let result = set_order_status(&db, 1, OrderStatus::Completed).await;
        assert!(matches!(result.unwrap_err(), Error::NotFullyPaid));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_order_not_found_mock() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<order::Model>::new()])
            .into_connection();

        let result = set_order_status(&db, 42, OrderStatus::Processing).await;
        assert!(matches!(result.unwrap_err(), Error::OrderNotFound { id: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_daily_order_numbering() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_date();
        let tomorrow = today.succ_opt().unwrap();

        let first = create_order_on(&db, today, Some(ServiceType::EatIn)).await?;
        let second = create_order_on(&db, today, None).await?;
        let third = create_order_on(&db, today, Some(ServiceType::TakeAway)).await?;
        let next_day = create_order_on(&db, tomorrow, None).await?;

        assert_eq!(first.order_number, 1);
        assert_eq!(second.order_number, 2);
        assert_eq!(third.order_number, 3);
        assert_eq!(next_day.order_number, 1);
        assert_eq!(next_day.order_date, tomorrow);

        assert_eq!(first.status, OrderStatus::Pending);
        assert_eq!(first.total_price, None);
        assert_eq!(first.service_type, Some(ServiceType::EatIn));

        let found = get_order_by_number(&db, today, 2).await?.unwrap();
        assert_eq!(found.id, second.id);

        let numbers: Vec<i32> = get_orders_for_date(&db, today)
            .await?
            .iter()
            .map(|o| o.order_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        Ok(())
    }

    #[tokio::test]
    async fn test_numbering_continues_after_gaps() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_date();

        create_order_on(&db, today, None).await?;
        let second = create_order_on(&db, today, None).await?;
        let third = create_order_on(&db, today, None).await?;
        delete_order(&db, second.id).await?;

        // The highest number is still 3, so the next order gets 4
        let fourth = create_order_on(&db, today, None).await?;
        assert_eq!(fourth.order_number, third.order_number + 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_order_number_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let today = test_date();
        let existing = create_order_on(&db, today, None).await?;

        let clash = order::ActiveModel {
            order_number: Set(existing.order_number),
            order_date: Set(today),
            created_at: Set(Utc::now()),
            status: Set(OrderStatus::Pending),
            service_type: Set(None),
            total_price: Set(None),
            ..Default::default()
        };
        let result = clash.insert(&db).await;
        assert!(matches!(
            result.unwrap_err().sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_uses_today() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_order(&db, None).await?;
        assert_eq!(order.order_date, Local::now().date_naive());
        assert_eq!(order.order_number, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_order_scenario_item_then_full_payment() -> Result<()> {
        let (db, order, product) = setup_with_order_and_product().await?;
        assert_eq!(order.total_price, None);

        add_order_item(
            &db,
            order.id,
            NewOrderItem::product(product.id, 2).with_unit_price(money(1000)),
        )
        .await?;
        let order = find_order(&db, order.id).await?;
        assert_eq!(order.total_price, Some(money(2000)));
        assert_eq!(order.status, OrderStatus::Pending);

        add_payment(&db, order.id, money(2000), PaymentMode::Cash).await?;
        let order = find_order(&db, order.id).await?;
        assert_eq!(order.status, OrderStatus::Processing);
        assert!(is_fully_paid(&db, &order).await?);
        assert_eq!(balance_due(&db, &order).await?, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_gate() -> Result<()> {
        let (db, order, product) = setup_with_order_and_product().await?;
        add_order_item(&db, order.id, NewOrderItem::product(product.id, 1)).await?;

        let result = set_order_status(&db, order.id, OrderStatus::Processing).await;
        assert!(matches!(result.unwrap_err(), Error::NotFullyPaid));

        // Partial payment is still not enough, and completed is gated the same way
        add_payment(&db, order.id, money(100), PaymentMode::Card).await?;
        let result = set_order_status(&db, order.id, OrderStatus::Completed).await;
        assert!(matches!(result.unwrap_err(), Error::NotFullyPaid));
        let order = find_order(&db, order.id).await?;
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(balance_due(&db, &order).await?, money(750));

        add_payment(&db, order.id, money(750), PaymentMode::MobileMoney).await?;
        // Completed may be set directly once paid
        let order = set_order_status(&db, order.id, OrderStatus::Completed).await?;
        assert_eq!(order.status, OrderStatus::Completed);

        // Going back to pending is never gated
        let order = set_order_status(&db, order.id, OrderStatus::Pending).await?;
        assert_eq!(order.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_order_counts_as_fully_paid() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;

        // Unset total and no payments compare equal at zero
        assert!(is_fully_paid(&db, &order).await?);
        let order = update_status(&db, order).await?;
        assert_eq!(order.status, OrderStatus::Processing);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_status_leaves_paid_orders_alone() -> Result<()> {
        let (db, order, product) = setup_with_order_and_product().await?;
        add_order_item(&db, order.id, NewOrderItem::product(product.id, 1)).await?;
        add_payment(&db, order.id, money(850), PaymentMode::Card).await?;

        let processing = find_order(&db, order.id).await?;
        assert_eq!(processing.status, OrderStatus::Processing);
        let unchanged = update_status(&db, processing.clone()).await?;
        assert_eq!(unchanged, processing);

        let completed = set_order_status(&db, order.id, OrderStatus::Completed).await?;
        let unchanged = update_status(&db, completed.clone()).await?;
        assert_eq!(unchanged, completed);
        assert_eq!(
            find_order(&db, order.id).await?.status,
            OrderStatus::Completed
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_update_total_price_only_saves_changes() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;

        // No items: total goes from unset to zero
        let order = update_total_price(&db, order).await?;
        assert_eq!(order.total_price, Some(Decimal::ZERO));

        let again = update_total_price(&db, order.clone()).await?;
        assert_eq!(again, order);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_service_type() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;

        let order = set_service_type(&db, order.id, Some(ServiceType::TakeAway)).await?;
        assert_eq!(order.service_type, Some(ServiceType::TakeAway));
        assert_eq!(
            find_order(&db, order.id).await?.service_type,
            Some(ServiceType::TakeAway)
        );

        let result = set_service_type(&db, 999, Some(ServiceType::EatIn)).await;
        assert!(matches!(result.unwrap_err(), Error::OrderNotFound { id: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_order_cascades() -> Result<()> {
        let (db, order, product) = setup_with_order_and_product().await?;
        add_order_item(&db, order.id, NewOrderItem::product(product.id, 2)).await?;
        add_payment(&db, order.id, money(500), PaymentMode::Cash).await?;

        delete_order(&db, order.id).await?;

        assert!(get_order_by_id(&db, order.id).await?.is_none());
        assert!(
            OrderItem::find()
                .filter(order_item::Column::OrderId.eq(order.id))
                .all(&db)
                .await?
                .is_empty()
        );
        assert_eq!(amount_paid(&db, order.id).await?, Decimal::ZERO);
        // Catalog records are untouched
        assert!(
            crate::core::product::get_product_by_id(&db, product.id)
                .await?
                .is_some()
        );

        Ok(())
    }
}
