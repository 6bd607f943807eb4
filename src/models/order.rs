// Order types

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ApiError;

/// Order lifecycle status, also used as a path segment when listing orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" | "CANCELED" => Ok(OrderStatus::Cancelled),
            other => Err(ApiError::Validation(format!("Unknown order status: {}", other))),
        }
    }
}

// ==================================================================================================
// Request Models
// ==================================================================================================

/// Delivery details of a new order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub delivery_date: NaiveDate,
    pub address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
}

/// `POST /orders/{storeId}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub order_create_request: OrderDraft,
    pub order_item_request_list: Vec<OrderLine>,
}

impl OrderCreateRequest {
    pub fn new(draft: OrderDraft, lines: Vec<OrderLine>) -> Self {
        Self {
            order_create_request: draft,
            order_item_request_list: lines,
        }
    }

    /// Reject orders the backend would refuse anyway
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.order_item_request_list.is_empty() {
            return Err(ApiError::Validation("Order has no items".to_string()));
        }
        if let Some(line) = self
            .order_item_request_list
            .iter()
            .find(|l| l.quantity < 1 || l.unit_price < 1.0)
        {
            return Err(ApiError::Validation(format!(
                "Invalid quantity or unit price for product {}",
                line.product_id
            )));
        }
        Ok(())
    }
}

// ==================================================================================================
// Response Models
// ==================================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub order_number: String,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub delivery_date: NaiveDate,
    pub address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub memo: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCanceled {
    pub order: Order,
    pub items: Vec<OrderItem>,
}
