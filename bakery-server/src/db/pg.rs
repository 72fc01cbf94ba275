//! PostgreSQL-backed store

use async_trait::async_trait;
use shared::models::{Order, OrderStatus, User, UserDeletion, UserStatus};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{
    AdminSettingsStore, OrderFilter, OrderStore, StoreResult, UserStore, admin_settings, orders,
    users,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and bring the schema up to date
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        users::list(&self.pool).await
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        users::find(&self.pool, id).await
    }

    async fn find_user_by_phone(&self, phone: &str) -> StoreResult<Option<User>> {
        users::find_by_phone(&self.pool, phone).await
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        users::insert(&self.pool, user).await
    }

    async fn set_user_status(&self, id: &str, status: UserStatus) -> StoreResult<Option<User>> {
        users::set_status(&self.pool, id, status).await
    }

    async fn delete_user(&self, id: &str, cascade: bool) -> StoreResult<Option<UserDeletion>> {
        users::delete(&self.pool, id, cascade).await
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        orders::insert(&self.pool, order).await
    }

    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>> {
        orders::find(&self.pool, id).await
    }

    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        archived_at: Option<i64>,
    ) -> StoreResult<Option<Order>> {
        orders::update_status(&self.pool, id, status, archived_at).await
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        orders::list(&self.pool, filter).await
    }

    async fn list_archived_orders(&self) -> StoreResult<Vec<Order>> {
        orders::list_archived(&self.pool).await
    }

    async fn hide_orders(&self, ids: &[String]) -> StoreResult<u64> {
        orders::hide(&self.pool, ids).await
    }

    async fn orders_in_period(
        &self,
        start: i64,
        end: i64,
        statuses: &[OrderStatus],
    ) -> StoreResult<Vec<Order>> {
        orders::in_period(&self.pool, start, end, statuses).await
    }
}

#[async_trait]
impl AdminSettingsStore for PgStore {
    async fn password_hash(&self) -> StoreResult<Option<String>> {
        admin_settings::password_hash(&self.pool).await
    }

    async fn set_password_hash(&self, hash: &str, now: i64) -> StoreResult<()> {
        admin_settings::upsert_password_hash(&self.pool, hash, now).await
    }
}
