//! Portico reply fields and message tables

use crate::error::PaymentResult;
use crate::money::{Currency, Money};
use crate::response::GatewayResponse;
use crate::xml::XmlNode;
use tracing::warn;

/// Gift card gateways answer success with a single `"0"`
pub const SUCCESS_CODE: &str = "0";

/// Issuer (`RspCode`) message
pub fn issuer_message(code: &str) -> &'static str {
    match code {
        "5" | "12" => "The card was declined.",
        "6" | "7" | "10" => "An error occurred while processing the card.",
        "3" | "8" => "Invalid card data.",
        "9" => "Must be greater than or equal 0.",
        "4" => "The card has expired.",
        "14" => "The 4-digit pin is invalid.",
        "13" => "The amount was partially approved.",
        _ => "Unknown issuer error.",
    }
}

/// Gateway (`GatewayRspCode`) message, when one is defined
pub fn gateway_message(code: &str) -> Option<&'static str> {
    match code {
        "-2" => Some("Authentication error. Please double check your service configuration."),
        "12" => Some("Invalid CPC data."),
        "13" => Some("Invalid card data."),
        "14" => Some("The card number is not a valid credit card number."),
        "30" => Some("Gateway timed out."),
        _ => None,
    }
}

/// Fields of a `PosResponse` (or a SOAP fault)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HpsReply {
    /// `Header/GatewayRspCode`
    pub gateway_rsp_code: Option<String>,
    /// `Header/GatewayRspMsg`
    pub gateway_rsp_msg: Option<String>,
    /// `Header/GatewayTxnId`
    pub gateway_txn_id: Option<String>,
    /// `RspCode` of the transaction element
    pub rsp_code: Option<String>,
    /// `RspText` of the transaction element
    pub rsp_text: Option<String>,
    /// `BalanceAmt` of the transaction element
    pub balance_amt: Option<String>,
    /// `AuthCode` of the transaction element
    pub auth_code: Option<String>,
    /// SOAP fault text
    pub fault: Option<String>,
}

impl HpsReply {
    /// Parse a raw reply body
    pub fn parse(raw: &str) -> PaymentResult<Self> {
        XmlNode::parse(raw).map(|root| Self::from_root(&root))
    }

    /// Extract fields from an already parsed envelope
    pub fn from_root(root: &XmlNode) -> Self {
        let fault = root.find("Fault").and_then(|fault| {
            fault
                .text_at(&["faultstring"])
                .or_else(|| fault.text_at(&["Reason", "Text"]))
        });

        let version = root.find("PosResponse").and_then(|r| r.child("Ver1.0"));
        let header = version.and_then(|v| v.child("Header"));
        let header_field = |name: &str| header.and_then(|h| h.text_at(&[name]));

        let transaction = version
            .and_then(|v| v.child("Transaction"))
            .and_then(|t| t.children().first());
        let transaction_field = |name: &str| transaction.and_then(|t| t.text_at(&[name]));

        Self {
            gateway_rsp_code: header_field("GatewayRspCode"),
            gateway_rsp_msg: header_field("GatewayRspMsg"),
            gateway_txn_id: header_field("GatewayTxnId"),
            rsp_code: transaction_field("RspCode"),
            rsp_text: transaction_field("RspText"),
            balance_amt: transaction_field("BalanceAmt"),
            auth_code: transaction_field("AuthCode"),
            fault,
        }
    }

    fn rsp_code(&self) -> &str {
        self.rsp_code.as_deref().unwrap_or(SUCCESS_CODE)
    }

    /// Gateway and issuer both answered `"0"`
    pub fn is_success(&self) -> bool {
        self.gateway_rsp_code.as_deref() == Some(SUCCESS_CODE) && self.rsp_code() == SUCCESS_CODE
    }

    /// Outcome text: fault, issuer message, or gateway message
    pub fn message(&self) -> Option<String> {
        if let Some(fault) = &self.fault {
            return Some(fault.clone());
        }

        match self.gateway_rsp_code.as_deref() {
            Some(SUCCESS_CODE) if self.rsp_code() != SUCCESS_CODE => {
                Some(issuer_message(self.rsp_code()).to_string())
            }
            // Approved with no RspCode: the gateway text, not "Unknown issuer error."
            Some(SUCCESS_CODE) => self.gateway_rsp_msg.clone(),
            code => code
                .and_then(gateway_message)
                .map(str::to_string)
                .or_else(|| self.gateway_rsp_msg.clone()),
        }
    }

    /// Remaining balance in minor units
    pub fn balance(&self) -> Option<Money> {
        let raw = self.balance_amt.as_deref()?;
        match Money::from_major_str(raw, Currency::USD) {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!(error = %e, "Ignoring unparseable BalanceAmt");
                None
            }
        }
    }

    /// Fold into the normalized result
    pub fn into_response(self, raw: impl Into<String>) -> GatewayResponse {
        GatewayResponse::success(raw)
            .with_success(self.is_success())
            .with_message(self.message())
            .with_balance(self.balance())
            .with_authorization(self.gateway_txn_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(header: &str, transaction: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
                <soap:Body>
                    <PosResponse rootUrl="https://cert.api2.heartlandportico.com/Hps.Exchange.PosGateway" xmlns="http://Hps.Exchange.PosGateway">
                        <Ver1.0>
                            <Header>{header}</Header>
                            <Transaction>{transaction}</Transaction>
                        </Ver1.0>
                    </PosResponse>
                </soap:Body>
            </soap:Envelope>"#
        )
    }

    #[test]
    fn test_balance_success() {
        let raw = envelope(
            "<GatewayTxnId>1034</GatewayTxnId><GatewayRspCode>0</GatewayRspCode><GatewayRspMsg>Success</GatewayRspMsg>",
            "<GiftCardBalance><RspCode>0</RspCode><RspText>Success</RspText><BalanceAmt>10.00</BalanceAmt></GiftCardBalance>",
        );
        let reply = HpsReply::parse(&raw).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.message().as_deref(), Some("Success"));

        let response = reply.into_response(raw.clone());
        assert!(response.success);
        assert_eq!(response.balance, Some(Money::usd(1000)));
        assert_eq!(response.authorization.as_deref(), Some("1034"));
        assert_eq!(response.raw, raw);
    }

    #[test]
    fn test_issuer_decline() {
        let raw = envelope(
            "<GatewayRspCode>0</GatewayRspCode><GatewayRspMsg>Success</GatewayRspMsg>",
            "<GiftCardSale><RspCode>5</RspCode><RspText>Declined</RspText></GiftCardSale>",
        );
        let reply = HpsReply::parse(&raw).unwrap();
        assert!(!reply.is_success());
        assert_eq!(reply.message().as_deref(), Some("The card was declined."));
    }

    #[test]
    fn test_gateway_error_table() {
        let raw = envelope(
            "<GatewayRspCode>-2</GatewayRspCode><GatewayRspMsg>Authentication Error</GatewayRspMsg>",
            "",
        );
        let reply = HpsReply::parse(&raw).unwrap();
        assert!(!reply.is_success());
        assert_eq!(
            reply.message().as_deref(),
            Some("Authentication error. Please double check your service configuration.")
        );

        let raw = envelope(
            "<GatewayRspCode>5</GatewayRspCode><GatewayRspMsg>Invalid Request</GatewayRspMsg>",
            "",
        );
        let reply = HpsReply::parse(&raw).unwrap();
        assert_eq!(reply.message().as_deref(), Some("Invalid Request"));
    }

    #[test]
    fn test_missing_rsp_code_defaults_to_success() {
        let raw = envelope(
            "<GatewayRspCode>0</GatewayRspCode><GatewayRspMsg>Success</GatewayRspMsg>",
            "<GiftCardActivate/>",
        );
        let reply = HpsReply::parse(&raw).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.message().as_deref(), Some("Success"));
    }

    #[test]
    fn test_soap_fault() {
        let raw = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
            <soap:Body><soap:Fault>
                <faultcode>soap:Client</faultcode>
                <faultstring>Server was unable to read request.</faultstring>
            </soap:Fault></soap:Body></soap:Envelope>"#;
        let response = HpsReply::parse(raw).unwrap().into_response(raw);
        assert!(!response.success);
        assert_eq!(
            response.message.as_deref(),
            Some("Server was unable to read request.")
        );
    }

    #[test]
    fn test_message_tables() {
        assert_eq!(issuer_message("12"), "The card was declined.");
        assert_eq!(issuer_message("7"), "An error occurred while processing the card.");
        assert_eq!(issuer_message("8"), "Invalid card data.");
        assert_eq!(issuer_message("14"), "The 4-digit pin is invalid.");
        assert_eq!(issuer_message("99"), "Unknown issuer error.");
        assert_eq!(gateway_message("30"), Some("Gateway timed out."));
        assert_eq!(gateway_message("1"), None);
    }
}
