//! SOAP request envelopes for the Portico POS gateway

use super::{GiftCard, GiftCurrency, SaleOptions};
use crate::config::HpsGiftConfig;
use crate::error::PaymentResult;
use crate::money::Money;
use crate::xml::XmlElement;
use secrecy::ExposeSecret;

/// SOAP 1.1 envelope namespace
pub const SOAP_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Portico namespace
pub const HPS_NAMESPACE: &str = "http://Hps.Exchange.PosGateway";

fn hps(name: &str) -> XmlElement {
    XmlElement::new(format!("hps:{name}"))
}

fn hps_text(name: &str, text: impl Into<String>) -> XmlElement {
    hps(name).text(text)
}

/// `hps:Amt`-style element holding a major-unit amount
pub fn amount(name: &str, money: Money) -> XmlElement {
    hps_text(name, money.to_major_string())
}

/// `hps:CardData` with the card number and optional PIN
pub fn card_data(card: &GiftCard) -> XmlElement {
    hps("CardData")
        .child(hps_text("CardNbr", card.number().expose_secret()))
        .child_opt(card.pin().map(|pin| hps_text("PIN", pin.expose_secret())))
}

/// Block1 body of a `GiftCardSale`
pub fn sale_body(
    card: &GiftCard,
    money: Money,
    currency: Option<GiftCurrency>,
    options: &SaleOptions,
) -> Vec<XmlElement> {
    let mut body = vec![amount("Amt", money), card_data(card)];
    if let Some(currency) = currency {
        body.push(hps_text("Currency", currency.code()));
    }
    if let Some(gratuity) = options.gratuity {
        body.push(amount("GratuityAmtInfo", gratuity));
    }
    if let Some(tax) = options.tax {
        body.push(amount("TaxAmtInfo", tax));
    }
    body
}

fn header(config: &HpsGiftConfig) -> XmlElement {
    hps("Header")
        .child(hps_text(
            "SecretAPIKey",
            config.secret_api_key.expose_secret(),
        ))
        .child_opt(config.developer_id.as_deref().map(|v| hps_text("DeveloperID", v)))
        .child_opt(config.version_number.as_deref().map(|v| hps_text("VersionNbr", v)))
        .child_opt(config.site_trace.as_deref().map(|v| hps_text("SiteTrace", v)))
}

/// Wrap an action body in the full `PosRequest` envelope
pub fn build_request(
    config: &HpsGiftConfig,
    action: &str,
    block1: Vec<XmlElement>,
) -> PaymentResult<String> {
    let transaction = hps("Transaction").child(hps(action).child(hps("Block1").children(block1)));

    XmlElement::new("SOAP:Envelope")
        .attr("xmlns:SOAP", SOAP_NAMESPACE)
        .attr("xmlns:hps", HPS_NAMESPACE)
        .child(
            XmlElement::new("SOAP:Body").child(
                hps("PosRequest").child(hps("Ver1.0").child(header(config)).child(transaction)),
            ),
        )
        .to_document()
}
