//! Order lookup and transaction id persistence for the checkout flow

use crate::error::{PaymentError, PaymentResult};
use crate::money::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Order number part of a payment order id (`R123456789-PAYMENT` → `R123456789`)
pub fn order_number(order_id: &str) -> &str {
    order_id.split('-').next().unwrap_or(order_id)
}

/// What the checkout flow needs to know about an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order number
    pub number: String,
    /// Remote order reference id
    pub order_reference_id: String,
    /// Authorization id recorded after a successful authorize call
    pub authorization_id: Option<String>,
    /// Capture id recorded after a capture call
    pub capture_id: Option<String>,
    /// Order total
    pub total: Money,
}

impl OrderRecord {
    /// Create a record with no transaction ids yet
    pub fn new(
        number: impl Into<String>,
        order_reference_id: impl Into<String>,
        total: Money,
    ) -> Self {
        Self {
            number: number.into(),
            order_reference_id: order_reference_id.into(),
            authorization_id: None,
            capture_id: None,
            total,
        }
    }
}

/// Order persistence owned by the embedding application
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Look up an order by number
    async fn find(&self, number: &str) -> PaymentResult<Option<OrderRecord>>;

    /// Remember the authorization id for an order
    async fn record_authorization(&self, number: &str, authorization_id: &str)
        -> PaymentResult<()>;

    /// Remember the capture id for an order
    async fn record_capture(&self, number: &str, capture_id: &str) -> PaymentResult<()>;
}

/// In-memory order store
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, OrderRecord>>>,
}

impl InMemoryOrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an order
    pub async fn insert(&self, record: OrderRecord) {
        self.orders
            .write()
            .await
            .insert(record.number.clone(), record);
    }

    /// Number of stored orders
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find(&self, number: &str) -> PaymentResult<Option<OrderRecord>> {
        Ok(self.orders.read().await.get(number).cloned())
    }

    async fn record_authorization(
        &self,
        number: &str,
        authorization_id: &str,
    ) -> PaymentResult<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(number)
            .ok_or_else(|| PaymentError::OrderNotFound(number.to_string()))?;
        order.authorization_id = Some(authorization_id.to_string());
        Ok(())
    }

    async fn record_capture(&self, number: &str, capture_id: &str) -> PaymentResult<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(number)
            .ok_or_else(|| PaymentError::OrderNotFound(number.to_string()))?;
        order.capture_id = Some(capture_id.to_string());
        Ok(())
    }
}
