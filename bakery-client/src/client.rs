//! Remote-first storefront client
//!
//! Every call goes to the server first. Writes that fail transiently are
//! queued and replayed in order by [`StorefrontClient::flush`]; reads and
//! admin credential calls surface their errors directly. While older writes
//! are still queued, a new write is flushed behind them or queued after them,
//! never sent ahead.

use std::collections::HashSet;

use shared::models::{
    AckResponse, AdminLoginResponse, ChangePasswordRequest, HealthResponse, Order, OrderCreate,
    OrderStatusUpdate, PeriodStatistics, User, UserCreate, UserDelete, UserDeletion,
    UserStatusUpdate,
};
use shared::util::new_id;

use crate::{
    ClientConfig, ClientError, ClientResult, HttpApi, PendingWrite, QueuedWrite, StorefrontApi,
    WriteQueue,
};

/// Result of a write
#[derive(Debug)]
pub enum WriteOutcome<T> {
    /// Accepted by the server
    Applied(T),
    /// Server unreachable, stored for [`StorefrontClient::flush`]
    Queued(QueuedWrite),
}

impl<T> WriteOutcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            WriteOutcome::Applied(value) => Some(value),
            WriteOutcome::Queued(_) => None,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, WriteOutcome::Queued(_))
    }
}

/// What one flush did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    pub sent: usize,
    /// Replays answered with 409
    pub already_applied: usize,
    /// Replays rejected for good (other 4xx)
    pub dropped: usize,
    /// Entries still queued
    pub remaining: usize,
}

enum Replay {
    Done,
    AlreadyApplied,
    Rejected,
    Stalled,
}

pub struct StorefrontClient<A: StorefrontApi> {
    api: A,
    queue: WriteQueue,
}

impl StorefrontClient<HttpApi> {
    /// HTTP client with the queue at `config.queue_path`
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(
            HttpApi::new(config)?,
            WriteQueue::new(config.queue_path.clone()),
        ))
    }
}

impl<A: StorefrontApi> StorefrontClient<A> {
    pub fn new(api: A, queue: WriteQueue) -> Self {
        Self { api, queue }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn queue(&self) -> &WriteQueue {
        &self.queue
    }

    pub fn pending(&self) -> ClientResult<usize> {
        self.queue.len()
    }

    /// Whether a new write may go straight to the server: nothing is queued,
    /// or a flush just emptied the queue
    async fn backlog_cleared(&self) -> ClientResult<bool> {
        if self.queue.is_empty()? {
            return Ok(true);
        }
        Ok(self.flush().await?.remaining == 0)
    }

    fn queue_behind<T>(&self, write: PendingWrite) -> ClientResult<WriteOutcome<T>> {
        tracing::debug!(write = %write.describe(), "Older writes pending, write queued behind them");
        self.queue.push(write).map(WriteOutcome::Queued)
    }

    fn queue_if_transient(&self, err: ClientError, write: PendingWrite) -> ClientResult<QueuedWrite> {
        if !err.is_transient() {
            return Err(err);
        }
        tracing::warn!(error = %err, write = %write.describe(), "Server unreachable, write queued");
        self.queue.push(write)
    }

    // ========== Writes ==========

    /// Register a customer. An id is assigned up front so a replay cannot
    /// create a second record.
    pub async fn register_user(&self, mut req: UserCreate) -> ClientResult<WriteOutcome<User>> {
        req.id.get_or_insert_with(new_id);
        if !self.backlog_cleared().await? {
            return self.queue_behind(PendingWrite::RegisterUser(req));
        }
        match self.api.register_user(&req).await {
            Ok(user) => Ok(WriteOutcome::Applied(user)),
            Err(e) => self
                .queue_if_transient(e, PendingWrite::RegisterUser(req))
                .map(WriteOutcome::Queued),
        }
    }

    pub async fn set_user_status(
        &self,
        req: UserStatusUpdate,
    ) -> ClientResult<WriteOutcome<User>> {
        if !self.backlog_cleared().await? {
            return self.queue_behind(PendingWrite::SetUserStatus(req));
        }
        match self.api.set_user_status(&req).await {
            Ok(user) => Ok(WriteOutcome::Applied(user)),
            Err(e) => self
                .queue_if_transient(e, PendingWrite::SetUserStatus(req))
                .map(WriteOutcome::Queued),
        }
    }

    pub async fn delete_user(&self, req: UserDelete) -> ClientResult<WriteOutcome<UserDeletion>> {
        if !self.backlog_cleared().await? {
            return self.queue_behind(PendingWrite::DeleteUser(req));
        }
        match self.api.delete_user(&req).await {
            Ok(summary) => Ok(WriteOutcome::Applied(summary)),
            Err(e) => self
                .queue_if_transient(e, PendingWrite::DeleteUser(req))
                .map(WriteOutcome::Queued),
        }
    }

    /// Place an order; like registration, the id is fixed before the first try
    pub async fn place_order(&self, mut req: OrderCreate) -> ClientResult<WriteOutcome<Order>> {
        req.id.get_or_insert_with(new_id);
        if !self.backlog_cleared().await? {
            return self.queue_behind(PendingWrite::PlaceOrder(req));
        }
        match self.api.place_order(&req).await {
            Ok(order) => Ok(WriteOutcome::Applied(order)),
            Err(e) => self
                .queue_if_transient(e, PendingWrite::PlaceOrder(req))
                .map(WriteOutcome::Queued),
        }
    }

    pub async fn update_order_status(
        &self,
        req: OrderStatusUpdate,
    ) -> ClientResult<WriteOutcome<Order>> {
        if !self.backlog_cleared().await? {
            return self.queue_behind(PendingWrite::UpdateOrderStatus(req));
        }
        match self.api.update_order_status(&req).await {
            Ok(order) => Ok(WriteOutcome::Applied(order)),
            Err(e) => self
                .queue_if_transient(e, PendingWrite::UpdateOrderStatus(req))
                .map(WriteOutcome::Queued),
        }
    }

    // ========== Replay ==========

    async fn send(&self, write: &PendingWrite) -> ClientResult<()> {
        match write {
            PendingWrite::RegisterUser(req) => self.api.register_user(req).await.map(drop),
            PendingWrite::SetUserStatus(req) => self.api.set_user_status(req).await.map(drop),
            PendingWrite::DeleteUser(req) => self.api.delete_user(req).await.map(drop),
            PendingWrite::PlaceOrder(req) => self.api.place_order(req).await.map(drop),
            PendingWrite::UpdateOrderStatus(req) => {
                self.api.update_order_status(req).await.map(drop)
            }
        }
    }

    async fn replay(&self, entry: &QueuedWrite) -> Replay {
        match self.send(&entry.write).await {
            Ok(()) => Replay::Done,
            Err(e) if e.is_already_applied() => Replay::AlreadyApplied,
            Err(e) if e.is_transient() => {
                tracing::debug!(error = %e, entry = %entry.id, "Replay stalled");
                Replay::Stalled
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    entry = %entry.id,
                    write = %entry.write.describe(),
                    "Queued write rejected, dropping"
                );
                Replay::Rejected
            }
        }
    }

    /// Replay queued writes oldest first.
    ///
    /// Stops at the first transient failure so later writes never overtake
    /// earlier ones; that entry and everything after it stay queued.
    pub async fn flush(&self) -> ClientResult<FlushReport> {
        let entries = self.queue.load()?;
        let mut report = FlushReport::default();
        let mut finished: HashSet<String> = HashSet::new();
        let mut stalled: Option<String> = None;

        for entry in &entries {
            match self.replay(entry).await {
                Replay::Done => report.sent += 1,
                Replay::AlreadyApplied => report.already_applied += 1,
                Replay::Rejected => report.dropped += 1,
                Replay::Stalled => {
                    stalled = Some(entry.id.clone());
                    break;
                }
            }
            finished.insert(entry.id.clone());
        }

        // Entries pushed while flushing are kept
        report.remaining = self.queue.retain(|entry| {
            if stalled.as_deref() == Some(entry.id.as_str()) {
                entry.attempts += 1;
            }
            !finished.contains(&entry.id)
        })?;

        if report.sent + report.already_applied + report.dropped > 0 {
            tracing::info!(
                sent = report.sent,
                already_applied = report.already_applied,
                dropped = report.dropped,
                remaining = report.remaining,
                "Write queue flushed"
            );
        }
        Ok(report)
    }

    // ========== Reads and admin calls ==========

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.api.health().await
    }

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.api.list_users().await
    }

    pub async fn list_orders(&self, phone: Option<&str>) -> ClientResult<Vec<Order>> {
        self.api.list_orders(phone).await
    }

    pub async fn statistics(&self, month: u32, year: i32) -> ClientResult<Vec<PeriodStatistics>> {
        self.api.statistics(month, year).await
    }

    pub async fn admin_login(&self, password: &str) -> ClientResult<AdminLoginResponse> {
        self.api.admin_login(password).await
    }

    pub async fn change_password(&self, req: &ChangePasswordRequest) -> ClientResult<AckResponse> {
        self.api.change_password(req).await
    }

    pub async fn reset_password(&self) -> ClientResult<AckResponse> {
        self.api.reset_password().await
    }

    pub async fn rotate_password(&self, current_password: &str) -> ClientResult<AckResponse> {
        self.api.rotate_password(current_password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use reqwest::StatusCode;
    use serde_json::json;
    use shared::error::{AppError, ErrorCode};
    use shared::models::{OrderItem, OrderStatus, UserStatus};
    use shared::money::parse_amount;
    use std::collections::{HashMap, VecDeque};
    use tempfile::TempDir;

    /// Scripted failure for the next write call
    enum Fault {
        Offline,
        Status(StatusCode, ErrorCode),
    }

    /// In-process server double: applies writes to a map keyed by id
    #[derive(Default)]
    struct FakeApi {
        faults: Mutex<VecDeque<Fault>>,
        orders: Mutex<HashMap<String, Order>>,
        placed: Mutex<Vec<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn fail_next(&self, fault: Fault) {
            self.faults.lock().push_back(fault);
        }

        fn check(&self, call: &str) -> ClientResult<()> {
            self.calls.lock().push(call.to_string());
            match self.faults.lock().pop_front() {
                None => Ok(()),
                Some(Fault::Offline) => Err(ClientError::Timeout),
                Some(Fault::Status(status, code)) => Err(ClientError::Api {
                    status,
                    error: AppError::new(code),
                }),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    fn user_from(req: &UserCreate) -> User {
        User {
            id: req.id.clone().unwrap_or_default(),
            full_name: req.full_name.clone(),
            phone: req.phone.clone(),
            address: req.address.clone(),
            approved: false,
            status: UserStatus::Pending,
            created_at: 0,
        }
    }

    #[async_trait]
    impl StorefrontApi for FakeApi {
        async fn health(&self) -> ClientResult<HealthResponse> {
            self.check("health")?;
            Ok(HealthResponse {
                status: "ok".into(),
                version: "test".into(),
            })
        }

        async fn register_user(&self, req: &UserCreate) -> ClientResult<User> {
            self.check("register_user")?;
            Ok(user_from(req))
        }

        async fn list_users(&self) -> ClientResult<Vec<User>> {
            self.check("list_users")?;
            Ok(Vec::new())
        }

        async fn set_user_status(&self, req: &UserStatusUpdate) -> ClientResult<User> {
            self.check("set_user_status")?;
            Ok(user_from(&UserCreate {
                id: Some(req.id.clone()),
                ..UserCreate::default()
            }))
        }

        async fn delete_user(&self, req: &UserDelete) -> ClientResult<UserDeletion> {
            self.check("delete_user")?;
            Ok(UserDeletion {
                success: true,
                deleted_user: req.id.clone(),
                cascade: req.cascade,
                deleted_orders: 0,
                detached_orders: 0,
            })
        }

        async fn place_order(&self, req: &OrderCreate) -> ClientResult<Order> {
            self.check("place_order")?;
            let id = req.id.clone().unwrap_or_default();
            let mut orders = self.orders.lock();
            if orders.contains_key(&id) {
                return Err(ClientError::Api {
                    status: StatusCode::CONFLICT,
                    error: AppError::already_exists("Order"),
                });
            }
            let order = Order {
                id: id.clone(),
                user_id: None,
                user_name: String::new(),
                user_phone: req.user_phone.clone(),
                user_address: String::new(),
                items: req.items.clone(),
                total_price: parse_amount(&req.total_price).unwrap_or_default(),
                status: OrderStatus::Pending,
                created_at: 0,
                archived_at: None,
            };
            self.placed.lock().push(id.clone());
            orders.insert(id, order.clone());
            Ok(order)
        }

        async fn list_orders(&self, _phone: Option<&str>) -> ClientResult<Vec<Order>> {
            self.check("list_orders")?;
            Ok(self.orders.lock().values().cloned().collect())
        }

        async fn update_order_status(&self, req: &OrderStatusUpdate) -> ClientResult<Order> {
            self.check("update_order_status")?;
            self.orders
                .lock()
                .get(&req.id)
                .cloned()
                .ok_or_else(|| ClientError::Api {
                    status: StatusCode::NOT_FOUND,
                    error: AppError::new(ErrorCode::OrderNotFound),
                })
        }

        async fn statistics(&self, _month: u32, _year: i32) -> ClientResult<Vec<PeriodStatistics>> {
            self.check("statistics")?;
            Ok(Vec::new())
        }

        async fn admin_login(&self, _password: &str) -> ClientResult<AdminLoginResponse> {
            self.check("admin_login")?;
            Ok(AdminLoginResponse {
                success: true,
                token: "t".into(),
                expires_in: 3_600_000,
                expires_at: 3_600_000,
            })
        }

        async fn change_password(&self, _req: &ChangePasswordRequest) -> ClientResult<AckResponse> {
            self.check("change_password")?;
            Ok(AckResponse::ok())
        }

        async fn reset_password(&self) -> ClientResult<AckResponse> {
            self.check("reset_password")?;
            Ok(AckResponse::ok())
        }

        async fn rotate_password(&self, _current_password: &str) -> ClientResult<AckResponse> {
            self.check("rotate_password")?;
            Ok(AckResponse::ok())
        }
    }

    fn client(dir: &TempDir) -> StorefrontClient<FakeApi> {
        StorefrontClient::new(
            FakeApi::default(),
            WriteQueue::new(dir.path().join("pending.json")),
        )
    }

    fn order_request() -> OrderCreate {
        OrderCreate {
            user_phone: "3001234567".into(),
            items: vec![OrderItem {
                id: "pan-queso".into(),
                name: "Pan de Queso".into(),
                price: 15000.into(),
                quantity: 2,
                image: None,
            }],
            total_price: json!(30000),
            ..OrderCreate::default()
        }
    }

    #[tokio::test]
    async fn test_online_write_is_applied() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        let outcome = client.place_order(order_request()).await.unwrap();
        let order = outcome.applied().unwrap();
        assert!(!order.id.is_empty());
        assert_eq!(client.pending().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_offline_write_is_queued_then_flushed() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        client.api().fail_next(Fault::Offline);
        let outcome = client.place_order(order_request()).await.unwrap();
        assert!(outcome.is_queued());
        assert_eq!(client.pending().unwrap(), 1);

        let report = client.flush().await.unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.remaining, 0);
        assert_eq!(client.api().orders.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_replay_conflict_counts_as_applied() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        // The server stored the order but the response was lost
        let mut req = order_request();
        req.id = Some("o-1".into());
        client.api().place_order(&req).await.unwrap();
        client.queue().push(PendingWrite::PlaceOrder(req)).unwrap();

        let report = client.flush().await.unwrap();
        assert_eq!(report.already_applied, 1);
        assert_eq!(report.remaining, 0);
        assert_eq!(client.api().orders.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_permanent_rejection_is_dropped() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        client
            .queue()
            .push(PendingWrite::UpdateOrderStatus(OrderStatusUpdate {
                id: "missing".into(),
                status: "processing".into(),
            }))
            .unwrap();

        let report = client.flush().await.unwrap();
        assert_eq!(report.dropped, 1);
        assert_eq!(report.remaining, 0);
    }

    #[tokio::test]
    async fn test_flush_stops_at_first_transient_failure() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        for id in ["o-1", "o-2"] {
            let mut req = order_request();
            req.id = Some(id.into());
            client.queue().push(PendingWrite::PlaceOrder(req)).unwrap();
        }
        assert_eq!(client.pending().unwrap(), 2);

        client.api().fail_next(Fault::Status(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError,
        ));
        let report = client.flush().await.unwrap();
        assert_eq!(report.sent, 0);
        assert_eq!(report.remaining, 2);

        let entries = client.queue().load().unwrap();
        assert_eq!(entries[0].attempts, 1);
        assert_eq!(entries[1].attempts, 0);

        let report = client.flush().await.unwrap();
        assert_eq!(report.sent, 2);
        assert_eq!(report.remaining, 0);
    }

    #[tokio::test]
    async fn test_new_writes_never_overtake_queued_ones() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        let with_id = |id: &str| OrderCreate {
            id: Some(id.into()),
            ..order_request()
        };

        client.api().fail_next(Fault::Offline);
        assert!(client.place_order(with_id("o-1")).await.unwrap().is_queued());

        // Still offline: the replay of o-1 stalls, so o-2 is not sent at all
        client.api().fail_next(Fault::Offline);
        assert!(client.place_order(with_id("o-2")).await.unwrap().is_queued());
        assert_eq!(client.api().calls(), vec!["place_order", "place_order"]);
        let queued: Vec<String> = client
            .queue()
            .load()
            .unwrap()
            .into_iter()
            .filter_map(|entry| match entry.write {
                PendingWrite::PlaceOrder(req) => req.id,
                _ => None,
            })
            .collect();
        assert_eq!(queued, vec!["o-1", "o-2"]);

        // Back online: the backlog goes first, then the new write
        let outcome = client.place_order(with_id("o-3")).await.unwrap();
        assert_eq!(outcome.applied().unwrap().id, "o-3");
        assert_eq!(*client.api().placed.lock(), vec!["o-1", "o-2", "o-3"]);
        assert_eq!(client.pending().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validation_errors_are_not_queued() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        client.api().fail_next(Fault::Status(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidOrderTotal,
        ));
        let err = client.place_order(order_request()).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidOrderTotal));
        assert_eq!(client.pending().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reads_never_fall_back() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        client.api().fail_next(Fault::Offline);
        assert!(client.list_orders(Some("3001234567")).await.is_err());
        assert_eq!(client.pending().unwrap(), 0);
        assert_eq!(client.api().calls(), vec!["list_orders"]);
    }

    #[tokio::test]
    async fn test_registration_id_is_fixed_before_first_try() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        client.api().fail_next(Fault::Offline);
        let outcome = client
            .register_user(UserCreate {
                full_name: "Ana Díaz".into(),
                phone: "3001234567".into(),
                ..UserCreate::default()
            })
            .await
            .unwrap();

        let WriteOutcome::Queued(entry) = outcome else {
            panic!("expected queued write");
        };
        let PendingWrite::RegisterUser(req) = entry.write else {
            panic!("unexpected write");
        };
        assert!(req.id.is_some());
    }
}
