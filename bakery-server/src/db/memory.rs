//! In-process store
//!
//! Same semantics as `PgStore`, rows kept in insertion order behind one
//! lock so every trait call is atomic.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{Order, OrderStatus, User, UserDeletion, UserStatus};

use super::{
    AdminSettingsStore, DELETED_USER_SUFFIX, OrderFilter, OrderStore, StoreError, StoreResult,
    UserStore,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    orders: Vec<Order>,
    admin_password_hash: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

/// Newest first; rows created in the same millisecond keep "last inserted first"
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> i64) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    out
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an order as-is, bypassing creation rules (fixtures)
    pub fn seed_order(&self, order: Order) {
        self.tables.write().orders.push(order);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(newest_first(&self.tables.read().users, |u| u.created_at))
    }

    async fn find_user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_phone(&self, phone: &str) -> StoreResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|u| u.phone == phone)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Duplicate("id"));
        }
        if tables.users.iter().any(|u| u.phone == user.phone) {
            return Err(StoreError::Duplicate("phone"));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn set_user_status(&self, id: &str, status: UserStatus) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write();
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.status = status;
        user.approved = status.legacy_approved();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: &str, cascade: bool) -> StoreResult<Option<UserDeletion>> {
        let mut tables = self.tables.write();
        let Some(pos) = tables.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        let user = tables.users.remove(pos);

        let owned = |o: &Order| o.user_id.as_deref() == Some(id);
        let before = tables.orders.len();
        if cascade {
            tables.orders.retain(|o| !owned(o));
        } else {
            tables
                .orders
                .retain(|o| !(owned(o) && !o.status.is_terminal()));
        }
        let deleted_orders = (before - tables.orders.len()) as u64;

        let mut detached_orders = 0;
        for order in tables.orders.iter_mut().filter(|o| owned(&**o)) {
            order.user_id = None;
            order.user_name.push_str(DELETED_USER_SUFFIX);
            detached_orders += 1;
        }

        Ok(Some(UserDeletion {
            success: true,
            deleted_user: user.full_name,
            cascade,
            deleted_orders,
            detached_orders,
        }))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        let mut tables = self.tables.write();
        if tables.orders.iter().any(|o| o.id == order.id) {
            return Err(StoreError::Duplicate("id"));
        }
        tables.orders.push(order.clone());
        Ok(())
    }

    async fn find_order(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.tables.read().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        archived_at: Option<i64>,
    ) -> StoreResult<Option<Order>> {
        let mut tables = self.tables.write();
        let Some(order) = tables.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.status = status;
        if archived_at.is_some() {
            order.archived_at = archived_at;
        }
        Ok(Some(order.clone()))
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let tables = self.tables.read();
        let matching: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        Ok(newest_first(&matching, |o| o.created_at))
    }

    async fn list_archived_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self
            .tables
            .read()
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::Archived)
            .cloned()
            .collect())
    }

    async fn hide_orders(&self, ids: &[String]) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        let mut hidden = 0;
        for order in tables
            .orders
            .iter_mut()
            .filter(|o| o.status == OrderStatus::Archived && ids.contains(&o.id))
        {
            order.status = OrderStatus::ArchivedHidden;
            hidden += 1;
        }
        Ok(hidden)
    }

    async fn orders_in_period(
        &self,
        start: i64,
        end: i64,
        statuses: &[OrderStatus],
    ) -> StoreResult<Vec<Order>> {
        let tables = self.tables.read();
        let matching: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| o.created_at >= start && o.created_at < end)
            .filter(|o| statuses.contains(&o.status))
            .cloned()
            .collect();
        Ok(newest_first(&matching, |o| o.created_at))
    }
}

#[async_trait]
impl AdminSettingsStore for MemoryStore {
    async fn password_hash(&self) -> StoreResult<Option<String>> {
        Ok(self.tables.read().admin_password_hash.clone())
    }

    async fn set_password_hash(&self, hash: &str, _now: i64) -> StoreResult<()> {
        self.tables.write().admin_password_hash = Some(hash.to_string());
        Ok(())
    }
}
