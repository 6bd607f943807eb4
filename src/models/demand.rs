// Demand planning types

use serde::{Deserialize, Serialize};

/// Result of a safety-stock check for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandCheck {
    #[serde(alias = "orderRequired")]
    pub is_order_required: bool,
    pub message: String,
}
