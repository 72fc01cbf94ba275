//! Monthly statistics (computed in real time from order rows)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Query for `GET /statistics?month=&year=`
///
/// Kept as strings so missing or malformed values produce the same
/// validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsQuery {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

/// Totals for one (month, year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatistics {
    /// `"{year}-{month}"`
    pub id: String,
    pub month: u32,
    pub year: i32,
    pub total_orders: u64,
    pub total_units: i64,
    pub total_price: Decimal,
    pub items: Vec<StatisticsLineItem>,
}

/// One (order, item) pair of a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsLineItem {
    pub name: String,
    pub quantity: i64,
    /// Unit price × quantity
    pub price: Decimal,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub order_id: String,
    /// Order creation time (epoch ms)
    pub order_date: i64,
}
