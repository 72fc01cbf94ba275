//! `users` table queries

use shared::models::{User, UserDeletion, UserStatus};
use sqlx::PgPool;

use super::{DELETED_USER_SUFFIX, StoreError};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub approved: bool,
    /// NULL on rows written before the column existed
    pub status: Option<String>,
    pub created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let status = UserStatus::from_legacy(row.status.as_deref(), row.approved);
        User {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            address: row.address,
            approved: status.legacy_approved(),
            status,
            created_at: row.created_at,
        }
    }
}

const COLUMNS: &str = "id, full_name, phone, address, approved, status, created_at";

pub async fn list(pool: &PgPool) -> Result<Vec<User>, StoreError> {
    let rows: Vec<UserRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC"))
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(User::from).collect())
}

pub async fn find(pool: &PgPool, id: &str) -> Result<Option<User>, StoreError> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(User::from))
}

pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>, StoreError> {
    let row: Option<UserRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE phone = $1"))
            .bind(phone)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(User::from))
}

pub async fn insert(pool: &PgPool, user: &User) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO users (id, full_name, phone, address, approved, status, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&user.id)
    .bind(&user.full_name)
    .bind(&user.phone)
    .bind(&user.address)
    .bind(user.approved)
    .bind(user.status.as_db())
    .bind(user.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_status(
    pool: &PgPool,
    id: &str,
    status: UserStatus,
) -> Result<Option<User>, StoreError> {
    let row: Option<UserRow> = sqlx::query_as(&format!(
        "UPDATE users SET status = $1, approved = $2 WHERE id = $3 RETURNING {COLUMNS}"
    ))
    .bind(status.as_db())
    .bind(status.legacy_approved())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(User::from))
}

pub async fn delete(
    pool: &PgPool,
    id: &str,
    cascade: bool,
) -> Result<Option<UserDeletion>, StoreError> {
    let mut tx = pool.begin().await?;

    let full_name: Option<String> =
        sqlx::query_scalar("SELECT full_name FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(full_name) = full_name else {
        return Ok(None);
    };

    let (deleted_orders, detached_orders) = if cascade {
        let deleted = sqlx::query("DELETE FROM orders WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        (deleted, 0)
    } else {
        let deleted = sqlx::query(
            "DELETE FROM orders WHERE user_id = $1 AND status IN ('pending', 'processing')",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        let detached = sqlx::query(
            "UPDATE orders SET user_id = NULL, user_name = user_name || $2 WHERE user_id = $1",
        )
        .bind(id)
        .bind(DELETED_USER_SUFFIX)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        (deleted, detached)
    };

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Some(UserDeletion {
        success: true,
        deleted_user: full_name,
        cascade,
        deleted_orders,
        detached_orders,
    }))
}
