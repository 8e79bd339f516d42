//! Order listing and shipment tracking numbers.

use crate::cache::LIST_TTL;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{ApiClient, Payload};
use crate::types::{ApiAck, Envelope, OrderPage, OrderQuery, decode, decode_ack};

impl ApiClient {
    /// # Errors
    ///
    /// Transport, business and decode errors.
    pub async fn list_orders(&self, query: &OrderQuery) -> Result<OrderPage, ApiError> {
        let endpoint = Endpoint::OrderList;
        let body = self.execute_cached(&endpoint, Payload::json(&endpoint, query)?, LIST_TTL).await?;
        if body.is_null() {
            return Ok(OrderPage::default());
        }
        let envelope: Envelope<OrderPage> = decode(endpoint.name(), body)?;
        Ok(envelope.content)
    }

    /// Record the courier tracking number (AWB) for an order.
    ///
    /// # Errors
    ///
    /// Validation, transport and business errors.
    pub async fn set_awb(&self, order_id: &str, awb: &str) -> Result<ApiAck, ApiError> {
        let (order_id, awb) = (order_id.trim(), awb.trim());
        if order_id.is_empty() {
            return Err(ApiError::Validation("order id is required".to_owned()));
        }
        if awb.is_empty() {
            return Err(ApiError::Validation("AWB number is required".to_owned()));
        }
        let endpoint = Endpoint::OrderSetAwb(order_id.to_owned());
        let body = self.execute(&endpoint, Payload::Form(vec![("awb", awb.to_owned())])).await?;
        self.cache().invalidate_prefix(&format!("{} ", Endpoint::OrderList.path()));
        tracing::info!(order_id, "awb recorded");
        decode_ack(endpoint.name(), body)
    }
}
