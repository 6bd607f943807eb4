// Inventory types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of `GET /inventory`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<ProductSummary>,
}

/// One product with its aggregated stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_id: Option<i64>,
    pub product_name: String,
    pub total_quantity: Option<i64>,
    pub minimum_quantity: Option<i64>,
    /// Individual stock lots, passed through as the backend sends them
    #[serde(default)]
    pub products: Vec<Value>,
}

impl ProductSummary {
    /// True when stock is known and below the store minimum
    pub fn is_below_minimum(&self) -> bool {
        match (self.total_quantity, self.minimum_quantity) {
            (Some(total), Some(minimum)) => total < minimum,
            _ => false,
        }
    }
}

/// Stock arrival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundRequest {
    pub name: String,
    pub quantity: u32,
    pub expiration_date: NaiveDate,
    pub product_code: String,
}

/// Stock deduction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundRequest {
    pub id: i64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_until_expiration: Option<u32>,
}
