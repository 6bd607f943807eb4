// Cart endpoints, scoped per store

use crate::error::ApiError;
use crate::http_client::ApiHttpClient;
use crate::models::cart::{CartItem, CartItemCreate};
use crate::models::Envelope;

const CART_ITEMS: &str = "cart-items";

/// Add items to a store's cart; returns the created cart item ids
pub async fn add_items(
    client: &ApiHttpClient,
    store_id: i64,
    items: &[CartItemCreate],
) -> Result<Envelope<Vec<i64>>, ApiError> {
    if items.iter().any(|item| item.quantity < 1) {
        return Err(ApiError::Validation("Quantity must be at least 1".to_string()));
    }
    client
        .send_json(client.post(&[CART_ITEMS, &store_id.to_string()]).json(items))
        .await
}

pub async fn list_items(client: &ApiHttpClient, store_id: i64) -> Result<Envelope<Vec<CartItem>>, ApiError> {
    client
        .send_json(client.get(&[CART_ITEMS, &store_id.to_string()]))
        .await
}

pub async fn delete_item(
    client: &ApiHttpClient,
    store_id: i64,
    cart_item_id: i64,
) -> Result<Envelope<String>, ApiError> {
    client
        .send_json(client.delete(&[
            CART_ITEMS,
            &store_id.to_string(),
            &cart_item_id.to_string(),
        ]))
        .await
}
