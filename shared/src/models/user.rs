//! Customer Model

use serde::{Deserialize, Serialize};

/// Approval status of a registered customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Registered, waiting for the admin
    Pending,
    /// Allowed to place orders
    Approved,
    /// Turned down by the admin
    Rejected,
}

impl UserStatus {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Value of the legacy `approved` boolean column
    pub fn legacy_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Resolve the status of rows written before the `status` column existed
    pub fn from_legacy(status: Option<&str>, approved: bool) -> Self {
        status
            .and_then(Self::from_db)
            .unwrap_or(if approved { Self::Approved } else { Self::Pending })
    }
}

/// Customer entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    /// Legacy mirror of `status == approved`
    pub approved: bool,
    pub status: UserStatus,
    pub created_at: i64,
}

impl User {
    pub fn can_order(&self) -> bool {
        self.status == UserStatus::Approved
    }
}

/// Registration payload (`POST /users`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    /// Client-generated id; the server generates one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Status change payload (`PUT`/`PATCH /users`)
///
/// `status` is kept as a raw string so unknown values surface as a
/// validation error instead of a generic body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusUpdate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Deletion payload (`DELETE /users`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDelete {
    pub id: String,
    #[serde(default)]
    pub cascade: bool,
}

/// Deletion summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeletion {
    pub success: bool,
    /// Full name of the removed customer
    pub deleted_user: String,
    pub cascade: bool,
    pub deleted_orders: u64,
    /// Terminal orders kept with the user reference cleared
    pub detached_orders: u64,
}
