//! Persistence gateway
//!
//! Services talk to the tables through the store traits below. `PgStore`
//! runs the queries against PostgreSQL; `MemoryStore` keeps the same rows in
//! process for tests and database-less development.

pub mod admin_settings;
pub mod memory;
pub mod orders;
pub mod pg;
pub mod users;

use async_trait::async_trait;
use shared::models::{Order, OrderStatus, User, UserDeletion, UserStatus};
use thiserror::Error;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Name suffix applied to orders kept after their customer is deleted
pub const DELETED_USER_SUFFIX: &str = " (usuario borrado)";

/// Store-level error
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint hit; carries the conflicting column (`id` or `phone`)
    #[error("duplicate {0}")]
    Duplicate(&'static str),

    /// Row that cannot be mapped back to a model
    #[error("corrupt row: {0}")]
    Decode(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error()
            && db_err.is_unique_violation()
        {
            let column = match db_err.constraint() {
                Some(name) if name.contains("phone") => "phone",
                _ => "id",
            };
            return StoreError::Duplicate(column);
        }
        StoreError::Sqlx(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which orders a listing returns (hidden orders are never listed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFilter {
    /// Every order except `archived_hidden` (admin view)
    All,
    /// One customer's orders; `archived` ones created before
    /// `archived_since` are left out
    ByPhone { phone: String, archived_since: i64 },
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if order.status == OrderStatus::ArchivedHidden {
            return false;
        }
        match self {
            OrderFilter::All => true,
            OrderFilter::ByPhone {
                phone,
                archived_since,
            } => {
                order.user_phone == *phone
                    && !(order.status == OrderStatus::Archived && order.created_at < *archived_since)
            }
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All customers, newest first
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_phone(&self, phone: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::Duplicate`] on an existing id or phone
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Sets `status` and the legacy `approved` flag; `None` if no row
    async fn set_user_status(&self, id: &str, status: UserStatus) -> StoreResult<Option<User>>;

    /// Removes the customer in one transaction.
    ///
    /// With `cascade` every order of the customer goes too. Without it,
    /// pending/processing orders are deleted and terminal ones are detached
    /// (user reference cleared, name suffixed with [`DELETED_USER_SUFFIX`]).
    /// `None` when the customer does not exist; nothing is changed then.
    async fn delete_user(&self, id: &str, cascade: bool) -> StoreResult<Option<UserDeletion>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] on an existing id
    async fn insert_order(&self, order: &Order) -> StoreResult<()>;

    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>>;

    /// Writes `status` (and `archived_at` when given); `None` if no row
    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        archived_at: Option<i64>,
    ) -> StoreResult<Option<Order>>;

    /// Newest first
    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>>;

    /// Orders currently in `archived`
    async fn list_archived_orders(&self) -> StoreResult<Vec<Order>>;

    /// Moves the given `archived` orders to `archived_hidden`
    async fn hide_orders(&self, ids: &[String]) -> StoreResult<u64>;

    /// Orders created in `[start, end)` with one of `statuses`, newest first
    async fn orders_in_period(
        &self,
        start: i64,
        end: i64,
        statuses: &[OrderStatus],
    ) -> StoreResult<Vec<Order>>;
}

#[async_trait]
pub trait AdminSettingsStore: Send + Sync {
    /// Stored admin password hash, if any
    async fn password_hash(&self) -> StoreResult<Option<String>>;

    /// Upserts the singleton settings row
    async fn set_password_hash(&self, hash: &str, now: i64) -> StoreResult<()>;
}

/// Everything the services need from persistence
pub trait Store: UserStore + OrderStore + AdminSettingsStore {}

impl<T: UserStore + OrderStore + AdminSettingsStore> Store for T {}
