//! Shared harness: the full router over an in-memory store

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use bakery_server::db::MemoryStore;
use bakery_server::{AppState, Config, build_app};
use http::{Method, Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "horno-caliente-42";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let hash = bcrypt::hash(ADMIN_PASSWORD, 4).unwrap();
        let config = Config {
            bcrypt_cost: 4,
            admin_password_hash: Some(hash),
            ..Config::development()
        };
        let store = Arc::new(MemoryStore::new());
        let state = AppState::with_store(&config, store.clone());
        Self {
            app: build_app(state),
            store,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(req).await.unwrap()
    }

    /// JSON request; returns status and parsed body (`Null` when empty)
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.send(builder.body(body).unwrap()).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn login(&self, password: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/admin-auth",
            None,
            Some(json!({ "password": password })),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn register(&self, name: &str, phone: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/users",
                None,
                Some(json!({ "fullName": name, "phone": phone, "address": "Calle 10 #4-21" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body
    }

    /// Register and approve through the admin API
    pub async fn approved_customer(&self, token: &str, name: &str, phone: &str) -> Value {
        let user = self.register(name, phone).await;
        let (status, body) = self
            .call(
                Method::PATCH,
                "/users",
                Some(token),
                Some(json!({ "id": user["id"], "status": "approved" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "approve failed: {body}");
        body
    }

    pub async fn place_order(&self, phone: &str, items: Value, total: Value) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/orders",
            None,
            Some(json!({ "userPhone": phone, "items": items, "totalPrice": total })),
        )
        .await
    }

    pub async fn set_order_status(&self, token: &str, id: &str, status: &str) -> (StatusCode, Value) {
        self.call(
            Method::PUT,
            "/orders",
            Some(token),
            Some(json!({ "id": id, "status": status })),
        )
        .await
    }
}

pub fn cake_items() -> Value {
    json!([
        { "id": "torta-chocolate", "name": "Torta de Chocolate", "price": 25000, "quantity": 2 },
        { "id": "pan-queso", "name": "Pan de Queso", "price": 15000, "quantity": 1 }
    ])
}
