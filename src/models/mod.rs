// Wire models for the back office REST API

pub mod auth;
pub mod cart;
pub mod demand;
pub mod inventory;
pub mod order;
pub mod settlement;
pub mod user;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, UNKNOWN_ERROR};

/// Response envelope used by every JSON endpoint: `{success, data, error}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Build a successful envelope around `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Unwrap the payload, turning `success: false` or a missing `data` into an error
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Business {
                message: self.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            });
        }
        self.data
            .ok_or_else(|| ApiError::Decode("Envelope has no data".to_string()))
    }
}
