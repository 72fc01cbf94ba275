//! Storefront API surface

use async_trait::async_trait;
use shared::models::{
    AckResponse, AdminLoginResponse, ChangePasswordRequest, HealthResponse, Order, OrderCreate,
    OrderStatusUpdate, PeriodStatistics, User, UserCreate, UserDelete, UserDeletion,
    UserStatusUpdate,
};

use crate::ClientResult;

/// One method per server route
///
/// [`crate::HttpApi`] talks to a real server; tests substitute their own.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn health(&self) -> ClientResult<HealthResponse>;

    // ========== Customers ==========

    async fn register_user(&self, req: &UserCreate) -> ClientResult<User>;
    async fn list_users(&self) -> ClientResult<Vec<User>>;
    async fn set_user_status(&self, req: &UserStatusUpdate) -> ClientResult<User>;
    async fn delete_user(&self, req: &UserDelete) -> ClientResult<UserDeletion>;

    // ========== Orders ==========

    async fn place_order(&self, req: &OrderCreate) -> ClientResult<Order>;
    /// `Some(phone)` for a customer's own orders, `None` for the admin list
    async fn list_orders(&self, phone: Option<&str>) -> ClientResult<Vec<Order>>;
    async fn update_order_status(&self, req: &OrderStatusUpdate) -> ClientResult<Order>;

    // ========== Statistics ==========

    async fn statistics(&self, month: u32, year: i32) -> ClientResult<Vec<PeriodStatistics>>;

    // ========== Admin ==========

    /// Sign in; the token is kept for later admin calls
    async fn admin_login(&self, password: &str) -> ClientResult<AdminLoginResponse>;
    async fn change_password(&self, req: &ChangePasswordRequest) -> ClientResult<AckResponse>;
    async fn reset_password(&self) -> ClientResult<AckResponse>;
    async fn rotate_password(&self, current_password: &str) -> ClientResult<AckResponse>;
}
