//! Payment Gateway Adapters
//!
//! Thin clients for Amazon Pay (MWS OffAmazonPayments) and the Heartland
//! Portico gift card gateway. Each call builds a signed or enveloped request,
//! POSTs it, and maps the processor's reply into a [`GatewayResponse`].
//!
//! ## Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Gateway Adapters                             │
//! │                                                                  │
//! │  ┌────────────────────────┐      ┌───────────────────────────┐  │
//! │  │   AmazonCheckout<S>    │      │                           │  │
//! │  │ authorize | capture    │      │                           │  │
//! │  │ credit | void | close  │      │                           │  │
//! │  └───────────┬────────────┘      │                           │  │
//! │              ▼                   │                           │  │
//! │  ┌────────────────────────┐      ┌───────────────────────────┐  │
//! │  │    AmazonMwsClient     │      │      HpsGiftClient        │  │
//! │  │  RequestSigner (HMAC)  │      │   SOAP envelope (XML)     │  │
//! │  └───────────┬────────────┘      └─────────────┬─────────────┘  │
//! │              └──────────────┬──────────────────┘                │
//! │                             ▼                                   │
//! │              HttpTransport → XmlNode → GatewayResponse          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paybridge_payments::{AmazonMwsClient, DetailsKind, Money, MwsConfig};
//!
//! let config = MwsConfig::from_env()?;
//! let client = AmazonMwsClient::new(&config)?;
//!
//! let order = client
//!     .get_details(DetailsKind::OrderReference, "S01-1234567-1234567")
//!     .await?;
//! if order.success {
//!     let auth = client.authorize("S01-1234567-1234567", Money::usd(1999)).await?;
//!     println!("{:?} {:?}", auth.authorization, auth.state);
//! }
//! ```
//!
//! Signing on its own:
//!
//! ```rust,ignore
//! use paybridge_payments::signer::{ParameterSet, sign};
//!
//! let params = ParameterSet::action("GetOrderReferenceDetails")
//!     .with("AmazonOrderReferenceId", "S01-1234567-1234567");
//! let body = sign(&params, b"secret", "mws.amazonservices.com", "/OffAmazonPayments/2013-01-01")?;
//! ```

pub mod config;
pub mod error;
pub mod money;
pub mod order;
pub mod reference;
pub mod response;
pub mod signer;
pub mod transport;
pub mod xml;

pub mod providers;

pub use config::*;
pub use error::*;
pub use money::*;
pub use order::{InMemoryOrderStore, OrderRecord, OrderStore};
pub use response::*;
pub use signer::{ParameterSet, RequestSigner, SignedRequest};
pub use transport::*;

#[cfg(feature = "amazon")]
pub use providers::amazon::{AmazonCheckout, AmazonMwsClient, DetailsKind, MwsReply};

#[cfg(feature = "hps-gift")]
pub use providers::hps_gift::{GiftCard, GiftCurrency, HpsGiftClient, HpsReply, SaleOptions};
