//! Amazon Pay (MWS OffAmazonPayments) client
//!
//! Every call builds a [`ParameterSet`], signs it with the account's
//! [`RequestSigner`], POSTs the signed body and folds the reply into a
//! [`GatewayResponse`]. Remote faults and HTTP failures come back as
//! unsuccessful responses; only configuration problems are `Err`.

pub mod checkout;
pub mod reply;

pub use checkout::AmazonCheckout;
pub use reply::{
    AuthorizationDetails, CaptureDetails, MwsReply, OrderReferenceDetails, RefundDetails,
};

use crate::config::MwsConfig;
use crate::error::{PaymentError, PaymentResult};
use crate::money::Money;
use crate::reference;
use crate::response::GatewayResponse;
use crate::signer::{ParameterSet, RequestSigner};
use crate::transport::{HttpTransport, ReqwestTransport, TransportConfig, TransportResponse};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Which object a details lookup fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailsKind {
    /// `GetOrderReferenceDetails`
    OrderReference,
    /// `GetAuthorizationDetails`
    Authorization,
    /// `GetCaptureDetails`
    Capture,
    /// `GetRefundDetails`
    Refund,
}

impl DetailsKind {
    /// MWS action name
    pub fn action(&self) -> &'static str {
        match self {
            Self::OrderReference => "GetOrderReferenceDetails",
            Self::Authorization => "GetAuthorizationDetails",
            Self::Capture => "GetCaptureDetails",
            Self::Refund => "GetRefundDetails",
        }
    }

    /// Parameter carrying the object id
    pub fn id_field(&self) -> &'static str {
        match self {
            Self::OrderReference => "AmazonOrderReferenceId",
            Self::Authorization => "AmazonAuthorizationId",
            Self::Capture => "AmazonCaptureId",
            Self::Refund => "AmazonRefundId",
        }
    }
}

/// MWS client for one seller account
#[derive(Clone)]
pub struct AmazonMwsClient {
    signer: RequestSigner,
    endpoint: String,
    auto_capture: bool,
    test: bool,
    transport: Arc<dyn HttpTransport>,
}

impl AmazonMwsClient {
    /// Create a client with the default `reqwest` transport
    pub fn new(config: &MwsConfig) -> PaymentResult<Self> {
        let transport = ReqwestTransport::new(&TransportConfig::default())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a custom transport
    pub fn with_transport(
        config: &MwsConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> PaymentResult<Self> {
        Ok(Self {
            signer: RequestSigner::new(config)?,
            endpoint: config.endpoint_url(),
            auto_capture: config.auto_capture,
            test: config.environment.is_test(),
            transport,
        })
    }

    /// URL requests are POSTed to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether this client talks to the sandbox
    pub fn is_test(&self) -> bool {
        self.test
    }

    /// Fetch an order reference, authorization, capture or refund
    pub async fn get_details(&self, kind: DetailsKind, id: &str) -> PaymentResult<GatewayResponse> {
        self.commit(ParameterSet::action(kind.action()).with(kind.id_field(), id))
            .await
    }

    /// Set the order total on an order reference
    pub async fn set_order_reference_details(
        &self,
        order_reference_id: &str,
        total: Money,
    ) -> PaymentResult<GatewayResponse> {
        self.commit(
            ParameterSet::action("SetOrderReferenceDetails")
                .with("AmazonOrderReferenceId", order_reference_id)
                .with(
                    "OrderReferenceAttributes.OrderTotal.Amount",
                    total.to_major_string(),
                )
                .with(
                    "OrderReferenceAttributes.OrderTotal.CurrencyCode",
                    total.currency,
                ),
        )
        .await
    }

    /// Confirm an order reference
    pub async fn confirm_order_reference(
        &self,
        order_reference_id: &str,
    ) -> PaymentResult<GatewayResponse> {
        self.commit(
            ParameterSet::action("ConfirmOrderReference")
                .with("AmazonOrderReferenceId", order_reference_id),
        )
        .await
    }

    /// Authorize `total` against an order reference
    pub async fn authorize(
        &self,
        order_reference_id: &str,
        total: Money,
    ) -> PaymentResult<GatewayResponse> {
        self.commit(
            ParameterSet::action("Authorize")
                .with("AmazonOrderReferenceId", order_reference_id)
                .with("AuthorizationReferenceId", reference::authorization_reference())
                .with("AuthorizationAmount.Amount", total.to_major_string())
                .with("AuthorizationAmount.CurrencyCode", total.currency)
                .with("CaptureNow", self.auto_capture)
                .with("TransactionTimeout", 0),
        )
        .await
    }

    /// Capture funds from an authorization
    pub async fn capture(
        &self,
        authorization_id: &str,
        capture_reference_id: &str,
        total: Money,
    ) -> PaymentResult<GatewayResponse> {
        self.commit(
            ParameterSet::action("Capture")
                .with("AmazonAuthorizationId", authorization_id)
                .with("CaptureReferenceId", capture_reference_id)
                .with("CaptureAmount.Amount", total.to_major_string())
                .with("CaptureAmount.CurrencyCode", total.currency),
        )
        .await
    }

    /// Refund captured funds
    pub async fn refund(
        &self,
        capture_id: &str,
        refund_reference_id: &str,
        total: Money,
    ) -> PaymentResult<GatewayResponse> {
        self.commit(
            ParameterSet::action("Refund")
                .with("AmazonCaptureId", capture_id)
                .with("RefundReferenceId", refund_reference_id)
                .with("RefundAmount.Amount", total.to_major_string())
                .with("RefundAmount.CurrencyCode", total.currency),
        )
        .await
    }

    /// Close an authorization
    pub async fn close_authorization(
        &self,
        authorization_id: &str,
    ) -> PaymentResult<GatewayResponse> {
        self.commit(
            ParameterSet::action("CloseAuthorization")
                .with("AmazonAuthorizationId", authorization_id),
        )
        .await
    }

    /// Authorize, then capture the authorization under a fresh reference
    pub async fn purchase(
        &self,
        order_reference_id: &str,
        total: Money,
    ) -> PaymentResult<GatewayResponse> {
        let authorization = self.authorize(order_reference_id, total).await?;
        match authorization.authorization.clone() {
            Some(authorization_id) if authorization.success => {
                self.capture(&authorization_id, &reference::capture_reference(), total)
                    .await
            }
            _ => Ok(authorization),
        }
    }

    /// Sign and send an arbitrary action
    pub async fn commit(&self, parameters: ParameterSet) -> PaymentResult<GatewayResponse> {
        let action = parameters.get("Action").unwrap_or("").to_string();
        let signed = self.signer.sign(parameters, Utc::now())?;
        debug!(action = %action, endpoint = %self.endpoint, "Sending MWS request");

        let response = match self
            .transport
            .post(&self.endpoint, FORM_CONTENT_TYPE, signed.body)
            .await
        {
            Ok(answer) => self.fold(&action, answer),
            Err(e @ PaymentError::Transport { .. }) => {
                warn!(action = %action, error = %e, "MWS request failed");
                GatewayResponse::failure(e.to_string(), "")
            }
            Err(e) => return Err(e),
        };

        info!(
            action = %action,
            success = response.success,
            state = response.state.as_deref().unwrap_or(""),
            "MWS call completed"
        );
        Ok(response.with_test(self.test))
    }

    fn fold(&self, action: &str, answer: TransportResponse) -> GatewayResponse {
        if answer.body.trim().is_empty() {
            let message = if answer.is_success() {
                "Empty response body".to_string()
            } else {
                PaymentError::Transport {
                    status: Some(answer.status),
                    message: "empty response body".into(),
                }
                .to_string()
            };
            return GatewayResponse::failure(message, answer.body);
        }

        match MwsReply::parse(&answer.body) {
            Ok(reply) => {
                if let MwsReply::Fault { code, message } = &reply {
                    warn!(
                        action,
                        status = answer.status,
                        code = code.as_deref().unwrap_or(""),
                        message = %message,
                        "MWS returned a fault"
                    );
                }
                reply.into_response(answer.body)
            }
            Err(e) => {
                warn!(action, status = answer.status, error = %e, "Unreadable MWS reply");
                GatewayResponse::failure(e.to_string(), answer.body)
            }
        }
    }
}

impl fmt::Debug for AmazonMwsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmazonMwsClient")
            .field("signer", &self.signer)
            .field("endpoint", &self.endpoint)
            .field("auto_capture", &self.auto_capture)
            .field("test", &self.test)
            .finish_non_exhaustive()
    }
}
