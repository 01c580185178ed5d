use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Currencies
// ============================================================================

const CURRENCIES: &[(&str, &str)] = &[
    ("AUD", "Australian Dollar"),
    ("CAD", "Canadian Dollar"),
    ("CNY", "Chinese Yuan"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("KRW", "South Korean Won"),
    ("SGD", "Singapore Dollar"),
    ("USD", "United States Dollar"),
    ("VND", "Vietnamese Dong"),
];

/// Static ISO 4217 lookup used by price validation
pub struct CurrencyRegistry;

impl CurrencyRegistry {
    /// Case-insensitive membership check
    pub fn is_valid(code: &str) -> bool {
        Self::name(code).is_some()
    }

    pub fn name(code: &str) -> Option<&'static str> {
        CURRENCIES
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|(_, name)| *name)
    }

    pub fn codes() -> impl Iterator<Item = &'static str> {
        CURRENCIES.iter().map(|(code, _)| *code)
    }
}

// ============================================================================
// Countries
// ============================================================================

// (alpha-2, alpha-3, name)
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("AU", "AUS", "Australia"),
    ("CA", "CAN", "Canada"),
    ("CN", "CHN", "China"),
    ("DE", "DEU", "Germany"),
    ("FR", "FRA", "France"),
    ("GB", "GBR", "United Kingdom"),
    ("JP", "JPN", "Japan"),
    ("KR", "KOR", "South Korea"),
    ("SG", "SGP", "Singapore"),
    ("TH", "THA", "Thailand"),
    ("US", "USA", "United States"),
    ("VN", "VNM", "Vietnam"),
];

/// Passport issuing countries, addressable by alpha-2 or alpha-3 code
pub struct CountryRegistry;

impl CountryRegistry {
    pub fn is_valid(code: &str) -> bool {
        Self::name(code).is_some()
    }

    pub fn name(code: &str) -> Option<&'static str> {
        COUNTRIES
            .iter()
            .find(|(a2, a3, _)| a2.eq_ignore_ascii_case(code) || a3.eq_ignore_ascii_case(code))
            .map(|(_, _, name)| *name)
    }
}

// ============================================================================
// Seat classes
// ============================================================================

/// Cabin class. Variants are declared in code order so that ordered maps
/// keyed by `SeatClass` iterate B, E, F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatClass {
    Business,
    Economy,
    First,
}

impl SeatClass {
    pub const ALL: [SeatClass; 3] = [SeatClass::Business, SeatClass::Economy, SeatClass::First];

    /// Single-letter code used as the seat number prefix
    pub fn code(&self) -> char {
        match self {
            SeatClass::Business => 'B',
            SeatClass::Economy => 'E',
            SeatClass::First => 'F',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeatClass::Business => "BUSINESS",
            SeatClass::Economy => "ECONOMY",
            SeatClass::First => "FIRST",
        }
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lookup of seat classes by code or registry name
pub struct SeatClassRegistry;

impl SeatClassRegistry {
    pub fn by_code(code: char) -> Option<SeatClass> {
        SeatClass::ALL.into_iter().find(|class| class.code() == code)
    }

    /// Exact (upper-case) name match
    pub fn by_name(name: &str) -> Option<SeatClass> {
        SeatClass::ALL.into_iter().find(|class| class.name() == name)
    }

    /// Resolves either a one-letter code (`"E"`) or a name (`"ECONOMY"`)
    pub fn resolve(token: &str) -> Option<SeatClass> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Self::by_code(code),
            _ => Self::by_name(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_lookup_is_case_insensitive() {
        assert!(CurrencyRegistry::is_valid("usd"));
        assert!(CurrencyRegistry::is_valid("VND"));
        assert!(!CurrencyRegistry::is_valid("XYZ"));
        assert_eq!(CurrencyRegistry::name("eur"), Some("Euro"));
        assert_eq!(CurrencyRegistry::codes().count(), 10);
    }

    #[test]
    fn test_country_lookup_accepts_both_code_lengths() {
        assert_eq!(CountryRegistry::name("VN"), Some("Vietnam"));
        assert_eq!(CountryRegistry::name("vnm"), Some("Vietnam"));
        assert!(!CountryRegistry::is_valid("ZZ"));
    }

    #[test]
    fn test_seat_class_resolution() {
        assert_eq!(SeatClassRegistry::resolve("E"), Some(SeatClass::Economy));
        assert_eq!(SeatClassRegistry::resolve("FIRST"), Some(SeatClass::First));
        assert_eq!(SeatClassRegistry::resolve("X"), None);
        assert_eq!(SeatClassRegistry::resolve(""), None);
        assert!(SeatClass::Business < SeatClass::Economy);
    }
}
