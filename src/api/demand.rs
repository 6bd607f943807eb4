// Demand planning endpoint

use crate::error::ApiError;
use crate::http_client::ApiHttpClient;
use crate::models::demand::DemandCheck;
use crate::models::Envelope;

/// Whether a product needs reordering given its safety stock
pub async fn check(client: &ApiHttpClient, product_id: i64) -> Result<Envelope<DemandCheck>, ApiError> {
    client
        .send_json(client.get(&["demand-plan", &product_id.to_string()]))
        .await
}
