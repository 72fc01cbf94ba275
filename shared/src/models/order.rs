//! Order Model
//!
//! An order snapshots the customer's name/phone/address at creation time and
//! carries its line items inline (stored as JSONB).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest quantity accepted on one line item
pub const MAX_ITEM_QUANTITY: i64 = 10_000;

/// Largest amount a `NUMERIC(12,2)` column holds (9 999 999 999.99)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Order lifecycle status
///
/// `pending → processing → completed → archived → archived_hidden`.
/// Hidden orders are retained for statistics but left out of listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Archived,
    ArchivedHidden,
}

impl OrderStatus {
    /// Statuses that count towards monthly statistics
    pub const COUNTED: [OrderStatus; 3] = [
        OrderStatus::Completed,
        OrderStatus::Archived,
        OrderStatus::ArchivedHidden,
    ];

    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            "archived_hidden" => Some(Self::ArchivedHidden),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Archived => "archived",
            Self::ArchivedHidden => "archived_hidden",
        }
    }

    /// The single status this one may advance to
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Completed),
            Self::Completed => Some(Self::Archived),
            Self::Archived => Some(Self::ArchivedHidden),
            Self::ArchivedHidden => None,
        }
    }

    /// Transition table: one step forward, or staying put
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        *self == target || self.next() == Some(target)
    }

    /// Completed or archived orders survive a non-cascading user deletion
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Archived | Self::ArchivedHidden
        )
    }
}

/// Line item of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Catalog product id
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Unit price
    pub price: Decimal,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderItem {
    /// Unit price × quantity; `None` on overflow
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Quantity in `1..=MAX_ITEM_QUANTITY` and price in `0..=MAX_AMOUNT`
    pub fn is_within_limits(&self) -> bool {
        (1..=MAX_ITEM_QUANTITY).contains(&self.quantity)
            && !self.price.is_sign_negative()
            && self.price <= MAX_AMOUNT
    }
}

/// Sum of line totals; `None` on overflow
pub fn items_total(items: &[OrderItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Cleared when the customer is deleted without cascade
    pub user_id: Option<String>,
    pub user_name: String,
    pub user_phone: String,
    pub user_address: String,
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub created_at: i64,
    /// When the order entered `archived`; absent for legacy rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<i64>,
}

impl Order {
    /// Sum of item quantities; `None` on overflow
    pub fn total_units(&self) -> Option<i64> {
        self.items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.quantity))
    }

    /// Sum of line totals; `None` on overflow
    pub fn items_total(&self) -> Option<Decimal> {
        items_total(&self.items)
    }
}

/// Order placement payload (`POST /orders`)
///
/// `totalPrice` is taken as raw JSON so both numbers and numeric strings
/// are accepted; the snapshot fields are filled from the customer record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_address: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total_price: serde_json::Value,
}

/// Status change payload (`PUT /orders`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub id: String,
    pub status: String,
}

/// Listing query (`GET /orders?phone=`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersQuery {
    #[serde(default)]
    pub phone: Option<String>,
}
