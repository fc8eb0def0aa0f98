//! Fields recovered from a scanned receipt

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

/// Currencies the receipt extractor recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eur => "€",
            Self::Usd => "$",
            Self::Gbp => "£",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUR" | "€" => Ok(Self::Eur),
            "USD" | "$" => Ok(Self::Usd),
            "GBP" | "£" => Ok(Self::Gbp),
            other => Err(format!("Unsupported currency '{}'", other)),
        }
    }
}

/// Heuristically extracted receipt fields; each one is independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl ReceiptFields {
    /// Whether no heuristic matched at all
    pub fn is_empty(&self) -> bool {
        self.merchant.is_none() && self.total.is_none() && self.date.is_none()
    }

    /// The currency, falling back to the EUR policy default
    pub fn currency_or_default(&self) -> Currency {
        self.currency.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse_and_default() {
        assert_eq!("usd".parse::<Currency>(), Ok(Currency::Usd));
        assert_eq!("£".parse::<Currency>(), Ok(Currency::Gbp));
        assert!("JPY".parse::<Currency>().is_err());
        assert_eq!(ReceiptFields::default().currency_or_default(), Currency::Eur);
    }

    #[test]
    fn test_serialization_omits_missing_fields() {
        let fields = ReceiptFields {
            total: Some(Money::from_cents(123456)),
            currency: Some(Currency::Eur),
            ..Default::default()
        };
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"total":123456,"currency":"EUR"}"#);
    }
}
