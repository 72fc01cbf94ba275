//! Admin credential service
//!
//! One shared admin password. The current bcrypt hash lives in the
//! `admin_settings` row; until that row exists the `ADMIN_PASSWORD_HASH`
//! environment value is used.

use shared::error::{AppError, ErrorCode};
use shared::models::{AckResponse, AdminLoginResponse, ChangePasswordRequest};

use crate::email::{self, EmailError};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::util::{hash_password, random_password, verify_password};

/// Minimum length of a password chosen by the admin
pub const MIN_PASSWORD_LEN: usize = 8;
/// Random bytes behind a reset password (12 printable characters)
const RESET_PASSWORD_BYTES: usize = 9;
/// Random bytes behind a rotated password
const ROTATE_PASSWORD_BYTES: usize = 14;

/// Current admin hash: stored row first, then configuration
async fn current_hash(state: &AppState) -> ServiceResult<String> {
    if let Some(hash) = state.store.password_hash().await? {
        return Ok(hash);
    }
    state
        .config
        .admin_password_hash
        .clone()
        .ok_or_else(|| ServiceError::App(AppError::new(ErrorCode::AdminNotConfigured)))
}

async fn check_password(state: &AppState, password: &str) -> ServiceResult<()> {
    let hash = current_hash(state).await?;
    if !verify_password(password.to_string(), hash).await {
        tracing::warn!("Admin password check failed");
        return Err(AppError::invalid_credentials().into());
    }
    Ok(())
}

async fn store_new_password(state: &AppState, password: String, now: i64) -> ServiceResult<()> {
    let hash = hash_password(password, state.config.bcrypt_cost).await?;
    state.store.set_password_hash(&hash, now).await?;
    Ok(())
}

/// Verify the admin password and issue a one-hour token
pub async fn authenticate(
    state: &AppState,
    password: &str,
    now: i64,
) -> ServiceResult<AdminLoginResponse> {
    if password.is_empty() {
        return Err(AppError::required("password").into());
    }
    check_password(state, password).await?;

    let issued = state
        .jwt
        .issue(now)
        .map_err(|e| ServiceError::Db(e.into()))?;

    tracing::info!("Admin signed in");
    Ok(AdminLoginResponse {
        success: true,
        token: issued.token,
        expires_in: issued.expires_in,
        expires_at: issued.expires_at,
    })
}

/// Replace the admin password after verifying the current one
pub async fn change_password(
    state: &AppState,
    req: &ChangePasswordRequest,
    now: i64,
) -> ServiceResult<AckResponse> {
    if req.current_password.is_empty() {
        return Err(AppError::required("currentPassword").into());
    }
    if req.new_password.is_empty() {
        return Err(AppError::required("newPassword").into());
    }
    if req.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort)
            .with_detail("minLength", MIN_PASSWORD_LEN)
            .into());
    }

    check_password(state, &req.current_password).await?;
    store_new_password(state, req.new_password.clone(), now).await?;

    tracing::info!("Admin password changed");
    Ok(AckResponse::with_message("Password updated"))
}

/// Generate a new random password and send it to the admin addresses.
///
/// Without an email transport the password is only written to the log.
/// With one, the new hash is stored only after the email went out, so a
/// failed delivery leaves the current password in place.
pub async fn reset_password(state: &AppState, now: i64) -> ServiceResult<AckResponse> {
    let password = random_password(RESET_PASSWORD_BYTES);

    if !state.mailer.is_configured() {
        store_new_password(state, password.clone(), now).await?;
        tracing::warn!(
            new_password = %password,
            "SendGrid not configured; admin password reset (development only)"
        );
        return Ok(AckResponse {
            success: true,
            message: Some("Password reset. Check the server log (development mode).".into()),
            dev_mode: Some(true),
        });
    }

    if state.mailer.recipient_count() == 0 {
        return Err(email_failed(EmailError::NoRecipients));
    }

    let hash = hash_password(password.clone(), state.config.bcrypt_cost).await?;
    let text = email::reset_password_text(&password, now);
    let sent = state
        .mailer
        .send_to_admins(email::RESET_SUBJECT, &text)
        .await
        .map_err(email_failed)?;
    state.store.set_password_hash(&hash, now).await?;

    tracing::info!(recipients = sent, "Admin password reset and emailed");
    Ok(AckResponse::with_message(format!(
        "New password sent to {sent} recipient(s)."
    )))
}

/// Replace the admin password with a strong random one after verifying the
/// current password. Email problems are logged, never returned; the new
/// password goes to the log whenever it could not be emailed.
pub async fn rotate_password(
    state: &AppState,
    current_password: &str,
    now: i64,
) -> ServiceResult<AckResponse> {
    if current_password.is_empty() {
        return Err(AppError::required("currentPassword").into());
    }
    check_password(state, current_password).await?;

    let password = random_password(ROTATE_PASSWORD_BYTES);
    store_new_password(state, password.clone(), now).await?;

    if state.mailer.is_configured() {
        let text = email::rotate_password_text(&password, now);
        if let Err(e) = state.mailer.send_to_admins(email::ROTATE_SUBJECT, &text).await {
            tracing::error!(error = %e, "Failed to email rotated admin password");
            tracing::warn!(new_password = %password, "Admin password rotated without email");
        }
    } else {
        tracing::warn!(
            new_password = %password,
            "SendGrid not configured; admin password rotated (development only)"
        );
    }

    tracing::info!("Admin password rotated");
    Ok(AckResponse::ok())
}

fn email_failed(e: EmailError) -> ServiceError {
    tracing::error!(error = %e, "Admin password email failed");
    AppError::new(ErrorCode::EmailDeliveryFailed).into()
}
