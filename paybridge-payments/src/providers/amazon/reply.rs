//! Typed MWS replies

use crate::error::PaymentResult;
use crate::money::{Currency, Money};
use crate::response::{Destination, GatewayResponse};
use crate::xml::XmlNode;
use tracing::warn;

/// Order reference as returned by Get/SetOrderReferenceDetails
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderReferenceDetails {
    /// `OrderReferenceStatus/State`
    pub state: Option<String>,
    /// `OrderReferenceStatus/ReasonCode`
    pub reason_code: Option<String>,
    /// First `Constraints/Constraint/Description`
    pub constraint: Option<String>,
    /// `OrderTotal`
    pub total: Option<Money>,
    /// `Destination/PhysicalDestination`
    pub destination: Option<Destination>,
}

/// Authorization as returned by Authorize/GetAuthorizationDetails
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationDetails {
    /// `AmazonAuthorizationId`
    pub authorization_id: Option<String>,
    /// `AuthorizationReferenceId`
    pub reference_id: Option<String>,
    /// `AuthorizationAmount`
    pub amount: Option<Money>,
    /// `AuthorizationStatus/State`
    pub state: Option<String>,
    /// `AuthorizationStatus/ReasonCode`
    pub reason_code: Option<String>,
}

/// Capture as returned by Capture/GetCaptureDetails
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureDetails {
    /// `AmazonCaptureId`
    pub capture_id: Option<String>,
    /// `CaptureAmount`
    pub amount: Option<Money>,
    /// `CaptureStatus/State`
    pub state: Option<String>,
    /// `CaptureStatus/ReasonCode`
    pub reason_code: Option<String>,
}

/// Refund as returned by Refund/GetRefundDetails
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefundDetails {
    /// `AmazonRefundId`
    pub refund_id: Option<String>,
    /// `RefundAmount`
    pub amount: Option<Money>,
    /// `RefundStatus/State`
    pub state: Option<String>,
    /// `RefundStatus/ReasonCode`
    pub reason_code: Option<String>,
}

/// One MWS reply, keyed by the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MwsReply {
    /// `ErrorResponse`
    Fault {
        /// `Error/Code`
        code: Option<String>,
        /// `Error/Message`
        message: String,
    },
    /// Order reference details
    OrderReference(OrderReferenceDetails),
    /// Authorization details
    Authorization(AuthorizationDetails),
    /// Capture details
    Capture(CaptureDetails),
    /// Refund details
    Refund(RefundDetails),
    /// `CloseAuthorizationResponse`
    Closed,
    /// Any other document without a fault (`ConfirmOrderReferenceResponse`, ...)
    Acknowledged,
}

impl MwsReply {
    /// Parse a raw reply body
    pub fn parse(raw: &str) -> PaymentResult<Self> {
        XmlNode::parse(raw).map(|root| Self::from_root(&root))
    }

    /// Classify an already parsed document
    pub fn from_root(root: &XmlNode) -> Self {
        match root.name() {
            "ErrorResponse" => Self::Fault {
                code: root.text_at(&["Error", "Code"]),
                message: root
                    .text_at(&["Error", "Message"])
                    .or_else(|| root.text_at(&["Error", "Code"]))
                    .unwrap_or_else(|| "Unknown MWS error".to_string()),
            },
            "GetOrderReferenceDetailsResponse" | "SetOrderReferenceDetailsResponse" => {
                Self::OrderReference(
                    result_details(root, "OrderReferenceDetails")
                        .map(order_reference)
                        .unwrap_or_default(),
                )
            }
            "AuthorizeResponse" | "GetAuthorizationDetailsResponse" => Self::Authorization(
                result_details(root, "AuthorizationDetails")
                    .map(authorization)
                    .unwrap_or_default(),
            ),
            "CaptureResponse" | "GetCaptureDetailsResponse" => Self::Capture(
                result_details(root, "CaptureDetails")
                    .map(capture)
                    .unwrap_or_default(),
            ),
            "RefundResponse" | "GetRefundDetailsResponse" => Self::Refund(
                result_details(root, "RefundDetails")
                    .map(refund)
                    .unwrap_or_default(),
            ),
            "CloseAuthorizationResponse" => Self::Closed,
            _ => Self::Acknowledged,
        }
    }

    /// Whether the reply is a fault
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }

    /// Fold into the normalized result
    pub fn into_response(self, raw: impl Into<String>) -> GatewayResponse {
        let raw = raw.into();
        match self {
            Self::Fault { message, .. } => GatewayResponse::failure(message, raw),
            Self::OrderReference(details) => GatewayResponse::success(raw)
                .with_message(details.constraint.clone().or(details.reason_code))
                .with_state(details.state)
                .with_amount(details.total)
                .with_constraints(details.constraint)
                .with_destination(details.destination),
            Self::Authorization(details) => GatewayResponse::success(raw)
                .with_message(details.reason_code)
                .with_authorization(details.authorization_id)
                .with_amount(details.amount)
                .with_state(details.state),
            Self::Capture(details) => GatewayResponse::success(raw)
                .with_message(details.reason_code)
                .with_capture_id(details.capture_id)
                .with_amount(details.amount)
                .with_state(details.state),
            Self::Refund(details) => GatewayResponse::success(raw)
                .with_message(details.reason_code)
                .with_refund_id(details.refund_id)
                .with_amount(details.amount)
                .with_state(details.state),
            Self::Closed | Self::Acknowledged => GatewayResponse::success(raw),
        }
    }
}

/// `<Action>Response/<Action>Result/<details>`
fn result_details<'a>(root: &'a XmlNode, details: &str) -> Option<&'a XmlNode> {
    root.children()
        .iter()
        .find(|child| child.name().ends_with("Result"))
        .and_then(|result| result.child(details))
}

fn price(node: &XmlNode, name: &str) -> Option<Money> {
    let amount = node.text_at(&[name, "Amount"])?;
    let currency = match node.text_at(&[name, "CurrencyCode"]) {
        None => Currency::default(),
        Some(code) => match Currency::from_code(&code) {
            Some(currency) => currency,
            None => {
                warn!(field = name, currency = %code, "Ignoring MWS amount in unsupported currency");
                return None;
            }
        },
    };

    match Money::from_major_str(&amount, currency) {
        Ok(money) => Some(money),
        Err(e) => {
            warn!(field = name, error = %e, "Ignoring unparseable MWS amount");
            None
        }
    }
}

fn order_reference(node: &XmlNode) -> OrderReferenceDetails {
    OrderReferenceDetails {
        state: node.text_at(&["OrderReferenceStatus", "State"]),
        reason_code: node.text_at(&["OrderReferenceStatus", "ReasonCode"]),
        constraint: node.text_at(&["Constraints", "Constraint", "Description"]),
        total: price(node, "OrderTotal"),
        destination: node.child("Destination").map(destination),
    }
}

fn destination(node: &XmlNode) -> Destination {
    let physical = |field: &str| node.text_at(&["PhysicalDestination", field]);
    Destination {
        destination_type: node.text_at(&["DestinationType"]),
        name: physical("Name"),
        address_line1: physical("AddressLine1"),
        address_line2: physical("AddressLine2"),
        city: physical("City"),
        state_or_region: physical("StateOrRegion"),
        postal_code: physical("PostalCode"),
        country_code: physical("CountryCode"),
        phone: physical("Phone"),
    }
}

fn authorization(node: &XmlNode) -> AuthorizationDetails {
    AuthorizationDetails {
        authorization_id: node.text_at(&["AmazonAuthorizationId"]),
        reference_id: node.text_at(&["AuthorizationReferenceId"]),
        amount: price(node, "AuthorizationAmount"),
        state: node.text_at(&["AuthorizationStatus", "State"]),
        reason_code: node.text_at(&["AuthorizationStatus", "ReasonCode"]),
    }
}

fn capture(node: &XmlNode) -> CaptureDetails {
    CaptureDetails {
        capture_id: node.text_at(&["AmazonCaptureId"]),
        amount: price(node, "CaptureAmount"),
        state: node.text_at(&["CaptureStatus", "State"]),
        reason_code: node.text_at(&["CaptureStatus", "ReasonCode"]),
    }
}

fn refund(node: &XmlNode) -> RefundDetails {
    RefundDetails {
        refund_id: node.text_at(&["AmazonRefundId"]),
        amount: price(node, "RefundAmount"),
        state: node.text_at(&["RefundStatus", "State"]),
        reason_code: node.text_at(&["RefundStatus", "ReasonCode"]),
    }
}
