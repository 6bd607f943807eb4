// Settlement types

use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    /// Ordered from HQ, payment outstanding
    #[serde(alias = "ORDERED")]
    Pending,
    Paid,
    /// Receipt PDF stored
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySettlement {
    #[serde(default)]
    pub items: Vec<SettlementItem>,
    pub order_count: i64,
    pub daily_amount: f64,
    pub monthly_accumulated_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySettlement {
    pub product_id: Option<i64>,
    pub total_amount: f64,
    pub commission_amount: f64,
    pub settlement_amount: f64,
    pub status: SettlementStatus,
    pub payout_date: Option<NaiveDate>,
}

/// A downloaded settlement statement
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Calendar month in `YYYY-MM` form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, ApiError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| ApiError::Validation(format!("Invalid month: {}-{}", year, month)))
    }
}

impl std::str::FromStr for YearMonth {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exactly YYYY-MM; chrono alone would accept "2026-1"
        let valid_shape = s.len() == 7 && s.as_bytes()[4] == b'-';
        let first_day = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .ok()
            .filter(|_| valid_shape)
            .ok_or_else(|| {
                ApiError::Validation(format!("Expected year-month as YYYY-MM, got {:?}", s))
            })?;
        Ok(Self { first_day })
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}
