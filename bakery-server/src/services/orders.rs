//! Order lifecycle
//!
//! `pending → processing → completed → archived → archived_hidden`, one step
//! at a time. Archived orders are hidden once they have spent a number of
//! business days in `archived`; hidden orders still count in statistics.

use shared::error::{AppError, ErrorCode};
use shared::models::{MAX_AMOUNT, Order, OrderCreate, OrderStatus, OrderStatusUpdate, items_total};
use shared::money::{amounts_match, parse_amount, round_money};
use shared::util::new_id;

use super::calendar::{add_business_days, months_before};
use super::users;
use crate::config::Config;
use crate::db::{OrderFilter, Store, StoreError};
use crate::error::ServiceResult;

/// Archival timing
#[derive(Debug, Clone, Copy)]
pub struct ArchivePolicy {
    /// Archived orders created before `now - retention_months` drop out of a
    /// customer's own listing
    pub retention_months: u32,
    /// Business days an order stays visible in `archived`
    pub hide_after_business_days: u32,
}

impl Default for ArchivePolicy {
    fn default() -> Self {
        Self {
            retention_months: 1,
            hide_after_business_days: 3,
        }
    }
}

impl From<&Config> for ArchivePolicy {
    fn from(config: &Config) -> Self {
        Self {
            retention_months: config.archive_retention_months,
            hide_after_business_days: config.archive_hide_business_days,
        }
    }
}

impl ArchivePolicy {
    /// When an archived order becomes hidden
    pub fn hide_deadline(&self, order: &Order) -> i64 {
        let anchor = order.archived_at.unwrap_or(order.created_at);
        add_business_days(anchor, self.hide_after_business_days)
    }
}

/// Place an order for an approved customer
pub async fn create(store: &dyn Store, req: OrderCreate, now: i64) -> ServiceResult<Order> {
    let total_price = parse_amount(&req.total_price)
        .map(round_money)
        .filter(|total| *total <= MAX_AMOUNT)
        .ok_or_else(|| {
            AppError::new(ErrorCode::InvalidOrderTotal)
                .with_detail("totalPrice", req.total_price.clone())
        })?;

    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty).into());
    }
    for (index, item) in req.items.iter().enumerate() {
        if item.name.trim().is_empty() || !item.is_within_limits() {
            return Err(AppError::new(ErrorCode::InvalidOrderItem)
                .with_detail("index", index)
                .with_detail("name", item.name.clone())
                .into());
        }
    }

    if req.user_phone.trim().is_empty() {
        return Err(AppError::required("userPhone").into());
    }
    let user = users::find_approved_by_phone(store, &req.user_phone).await?;

    let items_sum = items_total(&req.items).ok_or_else(|| {
        AppError::with_message(ErrorCode::InvalidOrderTotal, "Order items total is out of range")
    })?;
    if !amounts_match(total_price, items_sum) {
        return Err(AppError::with_message(
            ErrorCode::InvalidOrderTotal,
            "totalPrice does not match the items",
        )
        .with_detail("totalPrice", total_price.to_string())
        .with_detail("itemsTotal", round_money(items_sum).to_string())
        .into());
    }

    let order = Order {
        id: req
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(new_id),
        user_id: Some(user.id),
        user_name: user.full_name,
        user_phone: user.phone,
        user_address: user.address,
        items: req.items,
        total_price,
        status: OrderStatus::Pending,
        created_at: now,
        archived_at: None,
    };

    match store.insert_order(&order).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::already_exists("Order")
                .with_detail("id", order.id.clone())
                .into());
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(
        order_id = %order.id,
        user_id = ?order.user_id,
        total = %order.total_price,
        "Order created"
    );
    Ok(order)
}

/// Advance an order one step through its lifecycle
pub async fn update_status(
    store: &dyn Store,
    req: OrderStatusUpdate,
    now: i64,
) -> ServiceResult<Order> {
    if req.id.trim().is_empty() {
        return Err(AppError::required("id").into());
    }
    let target = OrderStatus::from_db(&req.status).ok_or_else(|| {
        AppError::new(ErrorCode::InvalidOrderStatus).with_detail("status", req.status.clone())
    })?;

    let current = store
        .find_order(&req.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if current.status == target {
        return Ok(current);
    }
    if !current.status.can_transition_to(target) {
        return Err(AppError::new(ErrorCode::InvalidStatusTransition)
            .with_detail("from", current.status.as_db())
            .with_detail("to", target.as_db())
            .into());
    }

    let archived_at = (target == OrderStatus::Archived).then_some(now);
    let order = store
        .update_order_status(&req.id, target, archived_at)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    tracing::info!(
        order_id = %order.id,
        from = current.status.as_db(),
        to = target.as_db(),
        "Order status changed"
    );
    Ok(order)
}

/// Listing for a customer (`phone`) or the admin (`None`), newest first
pub async fn list(
    store: &dyn Store,
    phone: Option<&str>,
    policy: ArchivePolicy,
    now: i64,
) -> ServiceResult<Vec<Order>> {
    hide_old_archived(store, policy, now).await?;

    let filter = match phone.map(str::trim) {
        Some(phone) => OrderFilter::ByPhone {
            phone: phone.to_string(),
            archived_since: months_before(now, policy.retention_months),
        },
        None => OrderFilter::All,
    };
    Ok(store.list_orders(&filter).await?)
}

/// Move archived orders past their deadline to `archived_hidden`.
///
/// Returns how many orders were hidden; rows are never deleted.
pub async fn hide_old_archived(
    store: &dyn Store,
    policy: ArchivePolicy,
    now: i64,
) -> ServiceResult<u64> {
    let due: Vec<String> = store
        .list_archived_orders()
        .await?
        .into_iter()
        .filter(|order| now >= policy.hide_deadline(order))
        .map(|order| order.id)
        .collect();

    if due.is_empty() {
        return Ok(0);
    }

    let hidden = store.hide_orders(&due).await?;
    tracing::info!(hidden, "Archived orders hidden");
    Ok(hidden)
}
