//! Unified error codes for the bakery storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 3xxx: Customer (user directory) errors
//! - 4xxx: Order errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the storefront UI can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request (malformed body or query)
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// HTTP method not supported on this route
    MethodNotAllowed = 9,

    // ==================== 1xxx: Auth ====================
    /// Admin token missing
    NotAuthenticated = 1001,
    /// Invalid admin password
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// New password is too short
    PasswordTooShort = 1008,

    // ==================== 3xxx: Customer ====================
    /// Customer not found
    UserNotFound = 3001,
    /// Phone number already registered
    PhoneAlreadyRegistered = 3002,
    /// Customer missing or not approved for ordering
    UserNotApproved = 3003,
    /// Unknown approval status
    InvalidUserStatus = 3004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Total price missing, not numeric, or inconsistent with items
    InvalidOrderTotal = 4003,
    /// Unknown order status
    InvalidOrderStatus = 4004,
    /// Status change not allowed by the order lifecycle
    InvalidStatusTransition = 4005,
    /// Order line item is malformed
    InvalidOrderItem = 4006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Admin password hash not configured
    AdminNotConfigured = 9003,
    /// Email delivery failed
    EmailDeliveryFailed = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::Unknown => "An unknown error occurred",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field is missing",
            Self::MethodNotAllowed => "Method not allowed",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",
            Self::PasswordTooShort => "New password must be at least 8 characters",

            Self::UserNotFound => "User not found",
            Self::PhoneAlreadyRegistered => "Phone number already registered",
            Self::UserNotApproved => "User not found or not approved",
            Self::InvalidUserStatus => "Invalid status",

            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order has no items",
            Self::InvalidOrderTotal => "Invalid totalPrice",
            Self::InvalidOrderStatus => "Invalid order status",
            Self::InvalidStatusTransition => "Order status transition not allowed",
            Self::InvalidOrderItem => "Invalid order item",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::AdminNotConfigured => "Admin password not configured",
            Self::EmailDeliveryFailed => "Email delivery failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            7 => Ok(Self::RequiredField),
            9 => Ok(Self::MethodNotAllowed),

            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            1008 => Ok(Self::PasswordTooShort),

            3001 => Ok(Self::UserNotFound),
            3002 => Ok(Self::PhoneAlreadyRegistered),
            3003 => Ok(Self::UserNotApproved),
            3004 => Ok(Self::InvalidUserStatus),

            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::OrderEmpty),
            4003 => Ok(Self::InvalidOrderTotal),
            4004 => Ok(Self::InvalidOrderStatus),
            4005 => Ok(Self::InvalidStatusTransition),
            4006 => Ok(Self::InvalidOrderItem),

            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::AdminNotConfigured),
            9004 => Ok(Self::EmailDeliveryFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::PhoneAlreadyRegistered.code(), 3002);
        assert_eq!(ErrorCode::InvalidStatusTransition.code(), 4005);
        assert_eq!(ErrorCode::AdminNotConfigured.code(), 9003);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(3), Ok(ErrorCode::NotFound));
        assert_eq!(ErrorCode::try_from(3003), Ok(ErrorCode::UserNotApproved));
        assert_eq!(ErrorCode::try_from(9004), Ok(ErrorCode::EmailDeliveryFailed));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(6), Err(InvalidErrorCode(6)));
        assert_eq!(ErrorCode::try_from(2001), Err(InvalidErrorCode(2001)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("1003").unwrap();
        assert_eq!(code, ErrorCode::TokenExpired);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::InternalError.to_string(), "E9001");
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::UserNotApproved.message(),
            "User not found or not approved"
        );
        assert_eq!(ErrorCode::InvalidOrderTotal.message(), "Invalid totalPrice");
    }
}
