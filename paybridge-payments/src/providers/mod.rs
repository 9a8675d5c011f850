//! Gateway clients

#[cfg(feature = "amazon")]
pub mod amazon;

#[cfg(feature = "hps-gift")]
pub mod hps_gift;

#[cfg(feature = "amazon")]
pub use amazon::{AmazonCheckout, AmazonMwsClient, DetailsKind};

#[cfg(feature = "hps-gift")]
pub use hps_gift::{GiftCard, GiftCurrency, HpsGiftClient, SaleOptions};
