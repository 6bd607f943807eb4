// Inventory endpoints

use serde_json::Value;

use crate::error::ApiError;
use crate::http_client::ApiHttpClient;
use crate::models::inventory::{InboundRequest, OutboundRequest, ProductList, ProductSummary};
use crate::models::Envelope;

/// All products with their stock
///
/// Accepts `{data: {products}}`, a bare `{products}`, or a `data` array.
pub async fn list_products(client: &ApiHttpClient) -> Result<Vec<ProductSummary>, ApiError> {
    let value: Value = client.send_json(client.get(&["inventory"])).await?;
    let products = extract_products(value)?;
    tracing::debug!(count = products.len(), "Fetched products");
    Ok(products)
}

fn extract_products(value: Value) -> Result<Vec<ProductSummary>, ApiError> {
    if value.is_null() {
        return Ok(Vec::new());
    }

    let decoded = match value.get("data") {
        Some(list @ Value::Array(_)) => serde_json::from_value::<Vec<ProductSummary>>(list.clone()),
        Some(data) if data.get("products").is_some() => {
            serde_json::from_value::<ProductList>(data.clone()).map(|list| list.products)
        }
        _ => serde_json::from_value::<ProductList>(value.clone()).map(|list| list.products),
    };

    decoded.map_err(|e| ApiError::Decode(format!("Unexpected product list: {}", e)))
}

pub async fn get_product(client: &ApiHttpClient, id: i64) -> Result<Envelope<ProductSummary>, ApiError> {
    client
        .send_json(client.get(&["inventory", &id.to_string()]))
        .await
}

pub async fn search_by_name(
    client: &ApiHttpClient,
    name: &str,
) -> Result<Envelope<Vec<ProductSummary>>, ApiError> {
    client
        .send_json(client.get(&["inventory", "search"]).query(&[("name", name)]))
        .await
}

/// Record a stock arrival
pub async fn inbound(client: &ApiHttpClient, request: &InboundRequest) -> Result<Envelope<Value>, ApiError> {
    if request.quantity == 0 {
        return Err(ApiError::Validation("Quantity must be at least 1".to_string()));
    }
    client
        .send_json(client.post(&["inventory", "inbound"]).json(request))
        .await
}

/// Deduct stock
pub async fn outbound(client: &ApiHttpClient, request: &OutboundRequest) -> Result<Envelope<Value>, ApiError> {
    if request.quantity == 0 {
        return Err(ApiError::Validation("Quantity must be at least 1".to_string()));
    }
    client
        .send_json(client.post(&["inventory", "outbound"]).json(request))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(name: &str) -> Value {
        json!({"productId": 1, "productName": name, "totalQuantity": 5, "minimumQuantity": 3})
    }

    #[test]
    fn test_extract_products_shapes() {
        let enveloped = json!({"success": true, "data": {"products": [product("Cider")]}});
        assert_eq!(extract_products(enveloped).unwrap()[0].product_name, "Cider");

        let bare = json!({"products": [product("Cola")]});
        assert_eq!(extract_products(bare).unwrap()[0].product_name, "Cola");

        let array = json!({"success": true, "data": [product("Water")]});
        assert_eq!(extract_products(array).unwrap()[0].product_name, "Water");

        let empty = json!({"success": true, "data": null});
        assert!(extract_products(empty).unwrap().is_empty());

        assert!(extract_products(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_extract_products_bad_shape() {
        let bad = json!({"products": [{"productId": "x"}]});
        assert!(matches!(extract_products(bad), Err(ApiError::Decode(_))));
    }
}
