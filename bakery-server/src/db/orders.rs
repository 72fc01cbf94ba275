//! `orders` table queries

use rust_decimal::Decimal;
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::PgPool;
use sqlx::types::Json;

use super::{OrderFilter, StoreError};

#[derive(sqlx::FromRow)]
pub struct OrderRow {
    pub id: String,
    pub user_id: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    pub user_address: String,
    pub items: Json<Vec<OrderItem>>,
    pub total_price: Decimal,
    pub status: String,
    pub created_at: i64,
    pub archived_at: Option<i64>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_db(&row.status).ok_or_else(|| {
            StoreError::Decode(format!("order {} has unknown status '{}'", row.id, row.status))
        })?;
        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            user_phone: row.user_phone,
            user_address: row.user_address,
            items: row.items.0,
            total_price: row.total_price,
            status,
            created_at: row.created_at,
            archived_at: row.archived_at,
        })
    }
}

const COLUMNS: &str = "id, user_id, user_name, user_phone, user_address, items, total_price, \
                       status, created_at, archived_at";

fn into_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, StoreError> {
    rows.into_iter().map(Order::try_from).collect()
}

pub async fn insert(pool: &PgPool, order: &Order) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO orders
            (id, user_id, user_name, user_phone, user_address, items, total_price,
             status, created_at, archived_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(&order.id)
    .bind(&order.user_id)
    .bind(&order.user_name)
    .bind(&order.user_phone)
    .bind(&order.user_address)
    .bind(Json(&order.items))
    .bind(order.total_price)
    .bind(order.status.as_db())
    .bind(order.created_at)
    .bind(order.archived_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(pool: &PgPool, id: &str) -> Result<Option<Order>, StoreError> {
    let row: Option<OrderRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    row.map(Order::try_from).transpose()
}

pub async fn update_status(
    pool: &PgPool,
    id: &str,
    status: OrderStatus,
    archived_at: Option<i64>,
) -> Result<Option<Order>, StoreError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "UPDATE orders SET status = $1, archived_at = COALESCE($2, archived_at)
         WHERE id = $3 RETURNING {COLUMNS}"
    ))
    .bind(status.as_db())
    .bind(archived_at)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(Order::try_from).transpose()
}

pub async fn list(pool: &PgPool, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
    let rows: Vec<OrderRow> = match filter {
        OrderFilter::All => {
            sqlx::query_as(&format!(
                "SELECT {COLUMNS} FROM orders
                 WHERE status <> 'archived_hidden'
                 ORDER BY created_at DESC"
            ))
            .fetch_all(pool)
            .await?
        }
        OrderFilter::ByPhone {
            phone,
            archived_since,
        } => {
            sqlx::query_as(&format!(
                "SELECT {COLUMNS} FROM orders
                 WHERE user_phone = $1
                   AND status <> 'archived_hidden'
                   AND NOT (status = 'archived' AND created_at < $2)
                 ORDER BY created_at DESC"
            ))
            .bind(phone)
            .bind(archived_since)
            .fetch_all(pool)
            .await?
        }
    };
    into_orders(rows)
}

pub async fn list_archived(pool: &PgPool) -> Result<Vec<Order>, StoreError> {
    let rows: Vec<OrderRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders WHERE status = 'archived'"))
            .fetch_all(pool)
            .await?;
    into_orders(rows)
}

pub async fn hide(pool: &PgPool, ids: &[String]) -> Result<u64, StoreError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let result = sqlx::query(
        "UPDATE orders SET status = 'archived_hidden'
         WHERE id = ANY($1) AND status = 'archived'",
    )
    .bind(ids)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn in_period(
    pool: &PgPool,
    start: i64,
    end: i64,
    statuses: &[OrderStatus],
) -> Result<Vec<Order>, StoreError> {
    let statuses: Vec<&str> = statuses.iter().map(OrderStatus::as_db).collect();
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM orders
         WHERE created_at >= $1 AND created_at < $2 AND status = ANY($3)
         ORDER BY created_at DESC"
    ))
    .bind(start)
    .bind(end)
    .bind(&statuses)
    .fetch_all(pool)
    .await?;
    into_orders(rows)
}
