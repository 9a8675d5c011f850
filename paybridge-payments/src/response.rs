//! Normalized gateway result

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Shipping destination attached to an order reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Destination type (`Physical`)
    pub destination_type: Option<String>,
    /// Recipient name
    pub name: Option<String>,
    /// First address line
    pub address_line1: Option<String>,
    /// Second address line
    pub address_line2: Option<String>,
    /// City
    pub city: Option<String>,
    /// State or region
    pub state_or_region: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// Country code
    pub country_code: Option<String>,
    /// Phone
    pub phone: Option<String>,
}

/// Uniform result of every adapter operation
///
/// Remote faults and HTTP failures never surface as `Err`; they come back
/// here with `success == false` and the remote or transport text in
/// `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// Whether the processor accepted the request
    pub success: bool,
    /// Human-readable outcome
    pub message: Option<String>,
    /// Authorization id (MWS authorization id, HPS gateway transaction id)
    pub authorization: Option<String>,
    /// Capture id
    pub capture_id: Option<String>,
    /// Refund id
    pub refund_id: Option<String>,
    /// Order total, authorized, captured or refunded amount
    pub amount: Option<Money>,
    /// Remaining card balance
    pub balance: Option<Money>,
    /// Remote object state (`Open`, `Completed`, ...)
    pub state: Option<String>,
    /// Constraint description on an order reference
    pub constraints: Option<String>,
    /// Shipping destination on an order reference
    pub destination: Option<Destination>,
    /// Whether the request went to a sandbox/certification environment
    pub test: bool,
    /// Unmodified response body
    pub raw: String,
}

impl GatewayResponse {
    /// Successful result
    pub fn success(raw: impl Into<String>) -> Self {
        Self {
            success: true,
            raw: raw.into(),
            ..Self::default()
        }
    }

    /// Unsuccessful result carrying a message
    pub fn failure(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            raw: raw.into(),
            ..Self::default()
        }
    }

    /// Override the success flag
    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// With message
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    /// With authorization id
    pub fn with_authorization(mut self, authorization: Option<String>) -> Self {
        self.authorization = authorization;
        self
    }

    /// With capture id
    pub fn with_capture_id(mut self, capture_id: Option<String>) -> Self {
        self.capture_id = capture_id;
        self
    }

    /// With refund id
    pub fn with_refund_id(mut self, refund_id: Option<String>) -> Self {
        self.refund_id = refund_id;
        self
    }

    /// With amount
    pub fn with_amount(mut self, amount: Option<Money>) -> Self {
        self.amount = amount;
        self
    }

    /// With balance
    pub fn with_balance(mut self, balance: Option<Money>) -> Self {
        self.balance = balance;
        self
    }

    /// With state
    pub fn with_state(mut self, state: Option<String>) -> Self {
        self.state = state;
        self
    }

    /// With constraint description
    pub fn with_constraints(mut self, constraints: Option<String>) -> Self {
        self.constraints = constraints;
        self
    }

    /// With destination
    pub fn with_destination(mut self, destination: Option<Destination>) -> Self {
        self.destination = destination;
        self
    }

    /// Mark as sandbox traffic
    pub fn with_test(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    /// `state` equals the given value
    pub fn state_is(&self, state: &str) -> bool {
        self.state.as_deref() == Some(state)
    }
}
