// Order endpoints, scoped per store

use crate::error::ApiError;
use crate::http_client::ApiHttpClient;
use crate::models::order::{
    Order, OrderCanceled, OrderCreateRequest, OrderCreated, OrderItem, OrderStatus,
};
use crate::models::Envelope;

const ORDERS: &str = "orders";

/// Place an order for a store
#[tracing::instrument(skip(client, order), fields(items = order.order_item_request_list.len()))]
pub async fn create(
    client: &ApiHttpClient,
    store_id: i64,
    order: &OrderCreateRequest,
) -> Result<Envelope<OrderCreated>, ApiError> {
    order.validate()?;

    let envelope: Envelope<OrderCreated> = client
        .send_json(client.post(&[ORDERS, &store_id.to_string()]).json(order))
        .await?;

    if let Some(created) = envelope.data.as_ref() {
        tracing::info!(order_id = created.order_id, "Order created");
    }
    Ok(envelope)
}

/// Orders of a store in the given status
pub async fn list(
    client: &ApiHttpClient,
    store_id: i64,
    status: OrderStatus,
) -> Result<Envelope<Vec<Order>>, ApiError> {
    client
        .send_json(client.get(&[ORDERS, status.as_str(), &store_id.to_string()]))
        .await
}

/// Line items of one order
pub async fn details(
    client: &ApiHttpClient,
    store_id: i64,
    order_id: i64,
) -> Result<Envelope<Vec<OrderItem>>, ApiError> {
    client
        .send_json(client.get(&[
            ORDERS,
            &store_id.to_string(),
            &order_id.to_string(),
            "details",
        ]))
        .await
}

#[tracing::instrument(skip(client))]
pub async fn cancel(
    client: &ApiHttpClient,
    store_id: i64,
    order_id: i64,
) -> Result<Envelope<OrderCanceled>, ApiError> {
    client
        .send_json(client.patch(&[ORDERS, &store_id.to_string(), &order_id.to_string()]))
        .await
}
