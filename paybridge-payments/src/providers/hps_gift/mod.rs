//! Heartland Portico gift card client
//!
//! Requests are SOAP envelopes POSTed as `text/xml`. Replies carry a gateway
//! header code and an issuer code; both must be `"0"` for success.

pub mod envelope;
pub mod reply;

pub use reply::{HpsReply, gateway_message, issuer_message};

use crate::config::HpsGiftConfig;
use crate::error::{PaymentError, PaymentResult};
use crate::money::Money;
use crate::response::GatewayResponse;
use crate::transport::{HttpTransport, ReqwestTransport, TransportConfig, TransportResponse};
use crate::xml::XmlElement;
use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

const XML_CONTENT_TYPE: &str = "text/xml";

/// Gift card credentials
#[derive(Clone)]
pub struct GiftCard {
    number: SecretString,
    pin: Option<SecretString>,
}

impl GiftCard {
    /// Card without a PIN
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: SecretString::from(number.into()),
            pin: None,
        }
    }

    /// Attach a PIN
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(SecretString::from(pin.into()));
        self
    }

    /// Card number
    pub fn number(&self) -> &SecretString {
        &self.number
    }

    /// PIN, if any
    pub fn pin(&self) -> Option<&SecretString> {
        self.pin.as_ref()
    }
}

impl fmt::Debug for GiftCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GiftCard")
            .field("number", &"[REDACTED]")
            .field("has_pin", &self.pin.is_some())
            .finish()
    }
}

/// Currency a sale is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GiftCurrency {
    /// US dollars
    Usd,
    /// Loyalty points
    Points,
}

impl GiftCurrency {
    /// `hps:Currency` value
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Points => "POINTS",
        }
    }

    /// Parse a currency code; codes other than `USD`/`POINTS` are not sent
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Self::Usd),
            "POINTS" => Some(Self::Points),
            _ => None,
        }
    }
}

/// Optional sale amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleOptions {
    /// `GratuityAmtInfo`
    pub gratuity: Option<Money>,
    /// `TaxAmtInfo`
    pub tax: Option<Money>,
}

impl SaleOptions {
    /// With gratuity
    pub fn gratuity(mut self, gratuity: Money) -> Self {
        self.gratuity = Some(gratuity);
        self
    }

    /// With tax
    pub fn tax(mut self, tax: Money) -> Self {
        self.tax = Some(tax);
        self
    }
}

/// Portico gift card client
#[derive(Clone)]
pub struct HpsGiftClient {
    config: HpsGiftConfig,
    endpoint: String,
    test: bool,
    transport: Arc<dyn HttpTransport>,
}

impl HpsGiftClient {
    /// Create a client with the default `reqwest` transport
    pub fn new(config: HpsGiftConfig) -> PaymentResult<Self> {
        let transport = ReqwestTransport::new(&TransportConfig::default())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a custom transport
    pub fn with_transport(
        config: HpsGiftConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> PaymentResult<Self> {
        config.validate()?;
        Ok(Self {
            endpoint: config.endpoint_url(),
            test: config.resolved_environment().is_test(),
            config,
            transport,
        })
    }

    /// URL requests are POSTed to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether this client talks to the certification environment
    pub fn is_test(&self) -> bool {
        self.test
    }

    /// Activate a card with an opening amount
    pub async fn activate(&self, card: &GiftCard, amount: Money) -> PaymentResult<GatewayResponse> {
        self.commit(
            "GiftCardActivate",
            vec![envelope::amount("Amt", amount), envelope::card_data(card)],
        )
        .await
    }

    /// Load value onto a card
    pub async fn add_value(&self, card: &GiftCard, amount: Money) -> PaymentResult<GatewayResponse> {
        self.commit(
            "GiftCardAddValue",
            vec![envelope::amount("Amt", amount), envelope::card_data(card)],
        )
        .await
    }

    /// Check a card's balance
    pub async fn balance(&self, card: &GiftCard) -> PaymentResult<GatewayResponse> {
        self.commit("GiftCardBalance", vec![envelope::card_data(card)])
            .await
    }

    /// Authorize up to `amount` against the card's balance.
    ///
    /// No hold is placed; the result's `amount` is the smaller of `amount`
    /// and the available balance.
    pub async fn authorize(&self, card: &GiftCard, amount: Money) -> PaymentResult<GatewayResponse> {
        let response = self.balance(card).await?;
        let available = response
            .balance
            .unwrap_or_else(|| Money::new(0, amount.currency));
        let authorized = Money::new(amount.amount.min(available.amount), amount.currency);

        debug!(
            requested = %amount,
            authorized = %authorized,
            success = response.success,
            "Gift card authorization"
        );
        Ok(response.with_amount(Some(authorized)))
    }

    /// Run a sale against the card
    pub async fn capture(
        &self,
        card: &GiftCard,
        amount: Money,
        currency: Option<GiftCurrency>,
        options: &SaleOptions,
    ) -> PaymentResult<GatewayResponse> {
        self.commit(
            "GiftCardSale",
            envelope::sale_body(card, amount, currency, options),
        )
        .await
    }

    /// Authorize, then sell the authorized amount
    pub async fn purchase(
        &self,
        card: &GiftCard,
        amount: Money,
        currency: Option<GiftCurrency>,
    ) -> PaymentResult<GatewayResponse> {
        let authorization = self.authorize(card, amount).await?;
        if !authorization.success {
            return Ok(authorization);
        }
        let authorized = authorization.amount.unwrap_or(amount);
        self.capture(card, authorized, currency, &SaleOptions::default())
            .await
    }

    async fn commit(&self, action: &str, block1: Vec<XmlElement>) -> PaymentResult<GatewayResponse> {
        let body = envelope::build_request(&self.config, action, block1)?;
        debug!(action, endpoint = %self.endpoint, "Sending Portico request");

        let response = match self
            .transport
            .post(&self.endpoint, XML_CONTENT_TYPE, body)
            .await
        {
            Ok(answer) => self.fold(action, answer),
            Err(e @ PaymentError::Transport { .. }) => {
                warn!(action, error = %e, "Portico request failed");
                GatewayResponse::failure(e.to_string(), "")
            }
            Err(e) => return Err(e),
        };

        info!(
            action,
            success = response.success,
            message = response.message.as_deref().unwrap_or(""),
            "Portico call completed"
        );
        Ok(response.with_test(self.test))
    }

    fn fold(&self, action: &str, answer: TransportResponse) -> GatewayResponse {
        if answer.body.trim().is_empty() {
            let message = PaymentError::Transport {
                status: Some(answer.status),
                message: "empty response body".into(),
            };
            return GatewayResponse::failure(message.to_string(), answer.body);
        }

        match HpsReply::parse(&answer.body) {
            Ok(reply) => reply.into_response(answer.body),
            Err(e) => {
                warn!(action, status = answer.status, error = %e, "Unreadable Portico reply");
                GatewayResponse::failure(e.to_string(), answer.body)
            }
        }
    }
}

impl fmt::Debug for HpsGiftClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HpsGiftClient")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .field("test", &self.test)
            .finish_non_exhaustive()
    }
}
