//! Report generation business logic.
//!
//! Builds the end-of-day summary for a single business date: how many orders were
//! taken, what they were worth, and how the money came in. All functions return
//! structured data; [`format_daily_summary`] renders it for logs or a receipt printer.

use crate::{
    core::{money, order},
    entities::{
        Payment,
        order::OrderStatus,
        payment::{self, PaymentMode},
    },
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Iterable, QueryFilter};
use std::fmt::Write as _;

/// Summary of one business day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    /// Business date being summarized
    pub date: NaiveDate,
    /// Number of orders taken on the date
    pub order_count: usize,
    /// Orders still waiting for payment
    pub pending_count: usize,
    /// Orders paid and being prepared
    pub processing_count: usize,
    /// Orders finished
    pub completed_count: usize,
    /// Total value of orders that are paid (processing or completed)
    pub revenue: Decimal,
    /// Money received against the day's orders, per payment mode
    pub payments_by_mode: Vec<(PaymentMode, Decimal)>,
    /// Money received against the day's orders, all modes
    pub payments_total: Decimal,
    /// What pending orders still owe
    pub outstanding: Decimal,
}

/// Generates the summary for every order taken on `date`.
pub async fn daily_summary(db: &DatabaseConnection, date: NaiveDate) -> Result<DailySummary> {
    let orders = order::get_orders_for_date(db, date).await?;
    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();

    let payments = if order_ids.is_empty() {
        Vec::new()
    } else {
        Payment::find()
            .filter(payment::Column::OrderId.is_in(order_ids))
            .all(db)
            .await?
    };

    let count_status = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

    let revenue = money::sum(
        orders
            .iter()
            .filter(|o| o.status.requires_full_payment())
            .map(order::order_total),
    )?;

    let payments_by_mode = PaymentMode::iter()
        .map(|mode| -> Result<(PaymentMode, Decimal)> {
            let collected = money::sum(
                payments
                    .iter()
                    .filter(|p| p.mode == mode)
                    .map(|p| p.amount),
            )?;
            Ok((mode, collected))
        })
        .collect::<Result<Vec<_>>>()?;
    let payments_total = money::sum(payments.iter().map(|p| p.amount))?;

    let mut outstanding = Decimal::ZERO;
    for pending in orders.iter().filter(|o| o.status == OrderStatus::Pending) {
        let paid = money::sum(
            payments
                .iter()
                .filter(|p| p.order_id == pending.id)
                .map(|p| p.amount),
        )?;
        outstanding += order::order_total(pending) - paid;
    }

    Ok(DailySummary {
        date,
        order_count: orders.len(),
        pending_count: count_status(OrderStatus::Pending),
        processing_count: count_status(OrderStatus::Processing),
        completed_count: count_status(OrderStatus::Completed),
        revenue,
        payments_by_mode,
        payments_total,
        outstanding: money::normalize(outstanding),
    })
}

const fn mode_label(mode: PaymentMode) -> &'static str {
    match mode {
        PaymentMode::Card => "Card",
        PaymentMode::Cash => "Cash",
        PaymentMode::MobileMoney => "Mobile money",
    }
}

/// Renders a summary as a short multi-line text block.
#[must_use]
pub fn format_daily_summary(summary: &DailySummary) -> String {
    let mut out = format!(
        "Summary for {}: {} orders ({} pending, {} processing, {} completed)\n",
        summary.date,
        summary.order_count,
        summary.pending_count,
        summary.processing_count,
        summary.completed_count
    );
    let _ = writeln!(out, "Revenue: {:.2}", summary.revenue);
    for (mode, amount) in &summary.payments_by_mode {
        let _ = writeln!(out, "  {}: {:.2}", mode_label(*mode), amount);
    }
    let _ = writeln!(out, "Collected: {:.2}", summary.payments_total);
    let _ = write!(out, "Outstanding: {:.2}", summary.outstanding);
    out
}
