//! HTTP implementation of [`StorefrontApi`]

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{ErrorBody, ErrorCode};
use shared::models::{
    AckResponse, AdminLoginRequest, AdminLoginResponse, ChangePasswordRequest, HealthResponse,
    Order, OrderCreate, OrderStatusUpdate, PeriodStatistics, RotatePasswordRequest, User,
    UserCreate, UserDelete, UserDeletion, UserStatusUpdate,
};

use crate::{ClientConfig, ClientError, ClientResult, StorefrontApi};

/// Network client for the bakery server
#[derive(Debug)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(config.token.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut request = self.client.request(method, url);
        if let Some(token) = self.token.read().as_deref() {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Http(e)
            }
        })?;
        Self::handle_response(response).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(method, path).json(body)).await
    }

    /// Non-2xx bodies are parsed as `{code, error, details}`
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let error = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => body.into_app_error(),
                Err(_) => shared::error::AppError::with_message(ErrorCode::Unknown, text),
            };
            return Err(ClientError::Api { status, error });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl StorefrontApi for HttpApi {
    async fn health(&self) -> ClientResult<HealthResponse> {
        self.send(self.request(Method::GET, "health")).await
    }

    async fn register_user(&self, req: &UserCreate) -> ClientResult<User> {
        self.send_json(Method::POST, "users", req).await
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.send(self.request(Method::GET, "users")).await
    }

    async fn set_user_status(&self, req: &UserStatusUpdate) -> ClientResult<User> {
        self.send_json(Method::PATCH, "users", req).await
    }

    async fn delete_user(&self, req: &UserDelete) -> ClientResult<UserDeletion> {
        self.send_json(Method::DELETE, "users", req).await
    }

    async fn place_order(&self, req: &OrderCreate) -> ClientResult<Order> {
        self.send_json(Method::POST, "orders", req).await
    }

    async fn list_orders(&self, phone: Option<&str>) -> ClientResult<Vec<Order>> {
        let mut request = self.request(Method::GET, "orders");
        if let Some(phone) = phone {
            request = request.query(&[("phone", phone)]);
        }
        self.send(request).await
    }

    async fn update_order_status(&self, req: &OrderStatusUpdate) -> ClientResult<Order> {
        self.send_json(Method::PUT, "orders", req).await
    }

    async fn statistics(&self, month: u32, year: i32) -> ClientResult<Vec<PeriodStatistics>> {
        let request = self
            .request(Method::GET, "statistics")
            .query(&[("month", month.to_string()), ("year", year.to_string())]);
        self.send(request).await
    }

    async fn admin_login(&self, password: &str) -> ClientResult<AdminLoginResponse> {
        let req = AdminLoginRequest {
            password: password.to_string(),
        };
        let response: AdminLoginResponse = self.send_json(Method::POST, "admin-auth", &req).await?;
        self.set_token(Some(response.token.clone()));
        Ok(response)
    }

    async fn change_password(&self, req: &ChangePasswordRequest) -> ClientResult<AckResponse> {
        self.send_json(Method::POST, "admin-change-password", req)
            .await
    }

    async fn reset_password(&self) -> ClientResult<AckResponse> {
        self.send(self.request(Method::POST, "admin-reset-password"))
            .await
    }

    async fn rotate_password(&self, current_password: &str) -> ClientResult<AckResponse> {
        let req = RotatePasswordRequest {
            current_password: current_password.to_string(),
        };
        self.send_json(Method::POST, "admin-rotate-password", &req)
            .await
    }
}
