use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use avia_shared::CurrencyRegistry;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<amount>\S+)\s+(?P<currency>\S+)$").expect("valid regex"));

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sign>-?)(?P<whole>[0-9]+)(?:[.,](?P<frac>[0-9]+))?$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("Price cannot be empty")]
    Empty,
    #[error("Price must be in format 'AMOUNT CURRENCY'")]
    InvalidFormat,
    #[error("Amount must be a decimal number ('.' or ',' separator)")]
    InvalidAmount,
    #[error("Amount cannot be negative")]
    NegativeAmount,
    #[error("Currency is not supported")]
    InvalidCurrency,
}

impl FieldError for PriceError {
    fn field(&self) -> &'static str {
        "price"
    }

    fn code(&self) -> &'static str {
        match self {
            PriceError::Empty => "EMPTY_PRICE",
            PriceError::InvalidFormat => "INVALID_FORMAT",
            PriceError::InvalidAmount => "INVALID_AMOUNT",
            PriceError::NegativeAmount => "NEGATIVE_AMOUNT",
            PriceError::InvalidCurrency => "INVALID_CURRENCY",
        }
    }

    fn message(&self) -> String {
        match self {
            PriceError::InvalidCurrency => format!(
                "Currency must be one of: {}",
                CurrencyRegistry::codes().collect::<Vec<_>>().join(", ")
            ),
            other => other.to_string(),
        }
    }
}

/// Non-negative amount in minor units (cents) plus an ISO 4217 currency.
///
/// Canonical form is `"1000.50 USD"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price {
    amount_minor: i64,
    currency: String,
}

impl Price {
    pub fn new(amount_minor: i64, currency: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();
        if amount_minor < 0 {
            errors.push(PriceError::NegativeAmount);
        }
        if !CurrencyRegistry::is_valid(currency) {
            errors.push(PriceError::InvalidCurrency);
        }
        errors.into_result(Self {
            amount_minor,
            currency: currency.to_ascii_uppercase(),
        })
    }

    /// Parses `"<amount> <CCY>"`, accepting `.` or `,` as decimal separator.
    pub fn create(value: &str) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if value.trim().is_empty() {
            errors.push(PriceError::Empty);
            return Err(errors);
        }
        let Some(caps) = PRICE_RE.captures(value.trim()) else {
            errors.push(PriceError::InvalidFormat);
            return Err(errors);
        };

        let amount = Self::parse_amount(&caps["amount"]);
        match amount {
            Some(minor) if minor < 0 => errors.push(PriceError::NegativeAmount),
            Some(_) => {}
            None => errors.push(PriceError::InvalidAmount),
        }

        let currency = &caps["currency"];
        if !CurrencyRegistry::is_valid(currency) {
            errors.push(PriceError::InvalidCurrency);
        }

        errors.into_result(Self {
            amount_minor: amount.unwrap_or_default(),
            currency: currency.to_ascii_uppercase(),
        })
    }

    fn parse_amount(amount: &str) -> Option<i64> {
        let caps = AMOUNT_RE.captures(amount)?;
        let whole: i64 = caps["whole"].parse().ok()?;
        let frac = caps.name("frac").map_or("", |m| m.as_str()).as_bytes();
        let digit = |i: usize| frac.get(i).map_or(0, |d| i64::from(d - b'0'));
        // Extra decimals round half up to the cent
        let cents = digit(0) * 10 + digit(1) + i64::from(digit(2) >= 5);
        let minor = whole.checked_mul(100)?.checked_add(cents)?;
        if &caps["sign"] == "-" {
            Some(-minor)
        } else {
            Some(minor)
        }
    }

    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.amount_minor / 100,
            self.amount_minor % 100,
            self.currency
        )
    }
}

impl FromStr for Price {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::create(s)
    }
}

impl TryFrom<String> for Price {
    type Error = ValidationErrors;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::create(&value)
    }
}

impl From<Price> for String {
    fn from(value: Price) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separator_is_canonicalised() {
        let price = Price::create("1000,50 usd").unwrap();
        assert_eq!(price.to_string(), "1000.50 USD");
        assert_eq!(price.amount_minor(), 100_050);
        assert_eq!(price.currency(), "USD");
    }

    #[test]
    fn test_amount_forms() {
        assert_eq!(Price::create("12 EUR").unwrap().to_string(), "12.00 EUR");
        assert_eq!(Price::create("12.5 EUR").unwrap().to_string(), "12.50 EUR");
        assert_eq!(Price::create("0.05 VND").unwrap().to_string(), "0.05 VND");
    }

    #[test]
    fn test_extra_decimals_round_to_cents() {
        assert_eq!(Price::create("1.234 USD").unwrap().to_string(), "1.23 USD");
        assert_eq!(Price::create("1,235 USD").unwrap().to_string(), "1.24 USD");
        assert_eq!(Price::create("9.999 EUR").unwrap().amount_minor(), 1000);
        assert_eq!(Price::create("0.0049 EUR").unwrap().to_string(), "0.00 EUR");
    }

    #[test]
    fn test_independent_errors_are_collected() {
        assert_eq!(Price::create("").unwrap_err().codes(), "EMPTY_PRICE");
        assert_eq!(Price::create("100USD").unwrap_err().codes(), "INVALID_FORMAT");
        assert_eq!(
            Price::create("-5 XYZ").unwrap_err().codes(),
            "NEGATIVE_AMOUNT;INVALID_CURRENCY"
        );
        assert_eq!(Price::create("1. USD").unwrap_err().codes(), "INVALID_AMOUNT");
        assert_eq!(Price::create("abc USD").unwrap_err().codes(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_structured_factory() {
        assert_eq!(Price::new(250, "gbp").unwrap().to_string(), "2.50 GBP");
        assert_eq!(
            Price::new(-1, "ABC").unwrap_err().codes(),
            "NEGATIVE_AMOUNT;INVALID_CURRENCY"
        );
    }

    #[test]
    fn test_invalid_currency_message_lists_codes() {
        let errors = Price::create("1 ABC").unwrap_err();
        assert!(errors.messages().contains("USD"));
    }
}
