//! Customer directory

use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserCreate, UserDeletion, UserStatus};
use shared::util::new_id;

use crate::db::{Store, StoreError};
use crate::error::{ServiceError, ServiceResult};

pub async fn list(store: &dyn Store) -> ServiceResult<Vec<User>> {
    Ok(store.list_users().await?)
}

/// Register a customer as `pending`
pub async fn register(store: &dyn Store, req: UserCreate, now: i64) -> ServiceResult<User> {
    let full_name = req.full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::required("fullName").into());
    }
    let phone = req.phone.trim();
    if phone.is_empty() {
        return Err(AppError::required("phone").into());
    }

    if store.find_user_by_phone(phone).await?.is_some() {
        return Err(phone_taken(phone).into());
    }

    let status = UserStatus::Pending;
    let user = User {
        id: req
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(new_id),
        full_name: full_name.to_string(),
        phone: phone.to_string(),
        address: req.address.trim().to_string(),
        approved: status.legacy_approved(),
        status,
        created_at: now,
    };

    match store.insert_user(&user).await {
        Ok(()) => {}
        Err(StoreError::Duplicate("phone")) => return Err(phone_taken(phone).into()),
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::already_exists("User")
                .with_detail("id", user.id.clone())
                .into());
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %user.id, "Customer registered");
    Ok(user)
}

fn phone_taken(phone: &str) -> AppError {
    AppError::new(ErrorCode::PhoneAlreadyRegistered).with_detail("phone", phone)
}

/// Change approval status; `None` is the legacy "approve" action
pub async fn set_status(
    store: &dyn Store,
    id: &str,
    status: Option<&str>,
) -> ServiceResult<User> {
    if id.trim().is_empty() {
        return Err(AppError::required("id").into());
    }
    let status = match status {
        None => UserStatus::Approved,
        Some(raw) => UserStatus::from_db(raw).ok_or_else(|| {
            AppError::new(ErrorCode::InvalidUserStatus).with_detail("status", raw)
        })?,
    };

    let user = store
        .set_user_status(id, status)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    tracing::info!(user_id = %user.id, status = status.as_db(), "Customer status changed");
    Ok(user)
}

/// Delete a customer, with or without their orders
pub async fn delete(store: &dyn Store, id: &str, cascade: bool) -> ServiceResult<UserDeletion> {
    if id.trim().is_empty() {
        return Err(AppError::required("id").into());
    }
    let summary = store
        .delete_user(id, cascade)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    tracing::info!(
        user_id = %id,
        cascade,
        deleted_orders = summary.deleted_orders,
        detached_orders = summary.detached_orders,
        "Customer deleted"
    );
    Ok(summary)
}

/// The customer behind `phone`, if they may place orders
pub async fn find_approved_by_phone(store: &dyn Store, phone: &str) -> ServiceResult<User> {
    match store.find_user_by_phone(phone.trim()).await? {
        Some(user) if user.can_order() => Ok(user),
        _ => Err(ServiceError::App(AppError::new(ErrorCode::UserNotApproved))),
    }
}
