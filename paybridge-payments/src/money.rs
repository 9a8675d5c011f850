//! Amounts in minor units and the currencies the gateways accept

use crate::error::{PaymentError, PaymentResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 4217 code, sent verbatim as `CurrencyCode`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    CNY,
    INR,
    MXN,
    BRL,
    SGD,
    HKD,
    NZD,
    SEK,
    NOK,
    DKK,
    PLN,
    ZAR,
    KRW,
}

impl Currency {
    /// Three-letter code
    pub fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::JPY => "JPY",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::CHF => "CHF",
            Self::CNY => "CNY",
            Self::INR => "INR",
            Self::MXN => "MXN",
            Self::BRL => "BRL",
            Self::SGD => "SGD",
            Self::HKD => "HKD",
            Self::NZD => "NZD",
            Self::SEK => "SEK",
            Self::NOK => "NOK",
            Self::DKK => "DKK",
            Self::PLN => "PLN",
            Self::ZAR => "ZAR",
            Self::KRW => "KRW",
        }
    }

    /// Minor-unit exponent
    pub fn decimals(&self) -> u32 {
        match self {
            Self::JPY | Self::KRW => 0,
            _ => 2,
        }
    }

    /// Case-insensitive lookup by code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "JPY" => Some(Self::JPY),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            "CHF" => Some(Self::CHF),
            "CNY" => Some(Self::CNY),
            "INR" => Some(Self::INR),
            "MXN" => Some(Self::MXN),
            "BRL" => Some(Self::BRL),
            "SGD" => Some(Self::SGD),
            "HKD" => Some(Self::HKD),
            "NZD" => Some(Self::NZD),
            "SEK" => Some(Self::SEK),
            "NOK" => Some(Self::NOK),
            "DKK" => Some(Self::DKK),
            "PLN" => Some(Self::PLN),
            "ZAR" => Some(Self::ZAR),
            "KRW" => Some(Self::KRW),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Signed amount in the currency's smallest unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Minor units (cents); negative for credits
    pub amount: i64,
    /// Denomination
    pub currency: Currency,
}

impl Money {
    /// Amount from minor units
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// US dollars from cents
    pub fn usd(cents: i64) -> Self {
        Self::new(cents, Currency::USD)
    }

    /// Parse a major-unit decimal string such as `"12.50"` as sent back by
    /// the processors.
    pub fn from_major_str(value: &str, currency: Currency) -> PaymentResult<Self> {
        let decimal = Decimal::from_str(value.trim())
            .map_err(|e| PaymentError::InvalidAmount(format!("{value:?}: {e}")))?;
        let out_of_range = || PaymentError::InvalidAmount(format!("{value:?} out of range"));
        let scaled = decimal
            .checked_mul(Decimal::from(10i64.pow(currency.decimals())))
            .ok_or_else(out_of_range)?
            .round();
        let amount = i64::try_from(scaled).map_err(|_| out_of_range())?;
        Ok(Self { amount, currency })
    }

    /// Major-unit decimal (`1999` cents → `19.99`)
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.amount, self.currency.decimals())
    }

    /// Major-unit string with the currency's fixed scale (`1999` cents → `"19.99"`)
    pub fn to_major_string(&self) -> String {
        format!(
            "{:.prec$}",
            self.to_decimal(),
            prec = self.currency.decimals() as usize
        )
    }

    /// Below zero
    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Same amount without the sign
    pub fn abs(&self) -> PaymentResult<Self> {
        let amount = self.amount.checked_abs().ok_or_else(|| {
            PaymentError::InvalidAmount(format!("{} has no absolute value", self.amount))
        })?;
        Ok(Self::new(amount, self.currency))
    }

    /// The smaller of two amounts in the same currency
    pub fn min(self, other: Self) -> Self {
        if other.amount < self.amount { other } else { self }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_major_string(), self.currency)
    }
}
