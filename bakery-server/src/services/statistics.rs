//! Monthly statistics, computed from order rows on every read

use rust_decimal::Decimal;
use shared::error::AppError;
use shared::models::{Order, OrderStatus, PeriodStatistics, StatisticsLineItem, StatisticsQuery};
use shared::money::round_money;

use super::calendar::month_bounds;
use crate::db::Store;
use crate::error::ServiceResult;

/// Validated `(month, year)`
fn parse_period(query: &StatisticsQuery) -> Result<(u32, i32), AppError> {
    let invalid = || {
        AppError::validation("month (1-12) and year are required")
            .with_detail("month", query.month.clone())
            .with_detail("year", query.year.clone())
    };

    let month: u32 = query
        .month
        .as_deref()
        .and_then(|m| m.trim().parse().ok())
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(invalid)?;
    let year: i32 = query
        .year
        .as_deref()
        .and_then(|y| y.trim().parse().ok())
        .filter(|y| (1..=9999).contains(y))
        .ok_or_else(invalid)?;

    Ok((month, year))
}

/// Statistics for one month: `[]` when nothing counts, otherwise one entry
pub async fn compute(
    store: &dyn Store,
    query: &StatisticsQuery,
) -> ServiceResult<Vec<PeriodStatistics>> {
    let (month, year) = parse_period(query)?;
    let (start, end) = month_bounds(year, month)
        .ok_or_else(|| AppError::validation("Invalid month or year"))?;

    let orders = store
        .orders_in_period(start, end, &OrderStatus::COUNTED)
        .await?;

    Ok(aggregate(&orders, month, year)?.into_iter().collect())
}

fn out_of_range(order: &Order) -> AppError {
    tracing::error!(order_id = %order.id, "Order amounts overflow the statistics totals");
    AppError::internal("Statistics totals out of range").with_detail("orderId", order.id.clone())
}

/// Fold the counted orders of a period (already newest first).
///
/// Rows written before item limits existed can still hold huge amounts; an
/// overflowing sum is an error, never a wrapped number.
pub fn aggregate(
    orders: &[Order],
    month: u32,
    year: i32,
) -> Result<Option<PeriodStatistics>, AppError> {
    if orders.is_empty() {
        return Ok(None);
    }

    let mut total_units: i64 = 0;
    let mut total_price = Decimal::ZERO;
    let mut items = Vec::new();

    for order in orders {
        total_price = total_price
            .checked_add(order.total_price)
            .ok_or_else(|| out_of_range(order))?;
        total_units = order
            .total_units()
            .and_then(|units| total_units.checked_add(units))
            .ok_or_else(|| out_of_range(order))?;
        for item in &order.items {
            let line_total = item.line_total().ok_or_else(|| out_of_range(order))?;
            items.push(StatisticsLineItem {
                name: item.name.clone(),
                quantity: item.quantity,
                price: round_money(line_total),
                user_id: order.user_id.clone(),
                user_name: Some(order.user_name.clone()),
                order_id: order.id.clone(),
                order_date: order.created_at,
            });
        }
    }

    Ok(Some(PeriodStatistics {
        id: format!("{year}-{month}"),
        month,
        year,
        total_orders: orders.len() as u64,
        total_units,
        total_price: round_money(total_price),
        items,
    }))
}
