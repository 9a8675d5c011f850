//! Order-level payment flow on top of the MWS client
//!
//! Order ids look like `R123456789-PAYMENTID`; the part before the first `-`
//! is the order number used against the [`OrderStore`].

use super::AmazonMwsClient;
use crate::error::{PaymentError, PaymentResult};
use crate::money::Money;
use crate::order::{OrderRecord, OrderStore, order_number};
use crate::reference;
use crate::response::GatewayResponse;
use tracing::{info, warn};

const AUTHORIZATION_OPEN: &str = "Open";
const CAPTURE_COMPLETED: &str = "Completed";

/// Checkout flow bound to an MWS client and an order store
#[derive(Debug, Clone)]
pub struct AmazonCheckout<S: OrderStore> {
    client: AmazonMwsClient,
    store: S,
}

impl<S: OrderStore> AmazonCheckout<S> {
    /// Create a checkout flow
    pub fn new(client: AmazonMwsClient, store: S) -> Self {
        Self { client, store }
    }

    /// Get the client
    pub fn client(&self) -> &AmazonMwsClient {
        &self.client
    }

    /// Get the order store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Authorize `amount` against the order's reference.
    ///
    /// Negative amounts are a successful no-op. Succeeds only when the
    /// authorization comes back `Open`.
    pub async fn authorize(&self, amount: Money, order_id: &str) -> PaymentResult<GatewayResponse> {
        if amount.is_negative() {
            return Ok(GatewayResponse::success("").with_message(Some("Success".into())));
        }

        let order = self.order(order_id).await?;
        let response = self
            .client
            .authorize(&order.order_reference_id, amount)
            .await?;
        if !response.success {
            warn!(order = %order.number, message = ?response.message, "Authorization rejected");
            return Ok(response);
        }

        if let Some(authorization_id) = &response.authorization {
            self.store
                .record_authorization(&order.number, authorization_id)
                .await?;
        }

        let open = response.state_is(AUTHORIZATION_OPEN);
        info!(order = %order.number, state = ?response.state, success = open, "Authorized");
        Ok(with_default_message(response.with_success(open), "Success"))
    }

    /// Capture `amount` from the order's stored authorization.
    ///
    /// Negative amounts are credited instead. Succeeds only when the capture
    /// comes back `Completed`.
    pub async fn capture(&self, amount: Money, order_id: &str) -> PaymentResult<GatewayResponse> {
        if amount.is_negative() {
            return self.credit(amount.abs()?, order_id).await;
        }

        let order = self.order(order_id).await?;
        let authorization_id = required(order.authorization_id.as_deref(), "authorization id", &order)?;
        let response = self
            .client
            .capture(authorization_id, &reference::capture_reference(), amount)
            .await?;

        if let Some(capture_id) = &response.capture_id {
            self.store.record_capture(&order.number, capture_id).await?;
        }

        let completed = response.success && response.state_is(CAPTURE_COMPLETED);
        info!(order = %order.number, state = ?response.state, success = completed, "Captured");
        Ok(with_default_message(response.with_success(completed), "OK"))
    }

    /// Refund `amount` from the order's stored capture
    pub async fn credit(&self, amount: Money, order_id: &str) -> PaymentResult<GatewayResponse> {
        let order = self.order(order_id).await?;
        let capture_id = required(order.capture_id.as_deref(), "capture id", &order)?;
        let response = self.client.refund(capture_id, order_id, amount).await?;

        info!(order = %order.number, amount = %amount, success = response.success, "Credited");
        Ok(response)
    }

    /// Refund the full order total from the stored capture
    pub async fn void(&self, order_id: &str) -> PaymentResult<GatewayResponse> {
        let order = self.order(order_id).await?;
        let capture_id = required(order.capture_id.as_deref(), "capture id", &order)?;
        let response = self.client.refund(capture_id, order_id, order.total).await?;

        info!(order = %order.number, success = response.success, "Voided");
        Ok(response)
    }

    /// Close the order's stored authorization
    pub async fn close(&self, order_id: &str) -> PaymentResult<GatewayResponse> {
        let order = self.order(order_id).await?;
        let authorization_id = required(order.authorization_id.as_deref(), "authorization id", &order)?;
        let response = self.client.close_authorization(authorization_id).await?;

        info!(order = %order.number, success = response.success, "Closed authorization");
        Ok(response)
    }

    /// Authorize then capture; a failed authorization is returned as is
    pub async fn purchase(&self, amount: Money, order_id: &str) -> PaymentResult<GatewayResponse> {
        let authorization = self.authorize(amount, order_id).await?;
        if !authorization.success {
            return Ok(authorization);
        }
        self.capture(amount, order_id).await
    }

    async fn order(&self, order_id: &str) -> PaymentResult<OrderRecord> {
        let number = order_number(order_id);
        self.store
            .find(number)
            .await?
            .ok_or_else(|| PaymentError::OrderNotFound(number.to_string()))
    }
}

fn required<'a>(
    id: Option<&'a str>,
    kind: &'static str,
    order: &OrderRecord,
) -> PaymentResult<&'a str> {
    id.ok_or_else(|| PaymentError::MissingReference {
        kind,
        order: order.number.clone(),
    })
}

fn with_default_message(response: GatewayResponse, message: &str) -> GatewayResponse {
    if response.message.is_some() {
        return response;
    }
    response.with_message(Some(message.to_string()))
}
