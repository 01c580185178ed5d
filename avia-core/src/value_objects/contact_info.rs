use crate::validation::{FieldError, ValidationErrors, ValidationResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_PHONE_DIGITS: usize = 15;
const MAX_ADDRESS_LENGTH: usize = 100;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9](\.?[a-zA-Z0-9_\-+%])*@[a-zA-Z0-9]([a-zA-Z0-9\-]*[a-zA-Z0-9])?(\.[a-zA-Z]{2,})+$")
        .expect("valid regex")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid regex"));
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s,.\-]*$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContactInfoError {
    #[error("Email cannot be empty")]
    EmptyEmail,
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Email must not exceed 254 characters")]
    EmailTooLong,
    #[error("Phone number cannot be empty")]
    EmptyPhone,
    #[error("Phone number must be 10-15 digits with an optional leading '+'")]
    InvalidPhoneFormat,
    #[error("Phone number must not exceed 15 digits")]
    PhoneTooLong,
    #[error("Address may only contain letters, digits, spaces and ,.-")]
    InvalidAddressFormat,
    #[error("Address must not exceed 100 characters")]
    AddressTooLong,
}

impl FieldError for ContactInfoError {
    fn field(&self) -> &'static str {
        "contact_info"
    }

    fn code(&self) -> &'static str {
        match self {
            ContactInfoError::EmptyEmail => "EMPTY_EMAIL",
            ContactInfoError::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
            ContactInfoError::EmailTooLong => "EMAIL_TOO_LONG",
            ContactInfoError::EmptyPhone => "EMPTY_PHONE",
            ContactInfoError::InvalidPhoneFormat => "INVALID_PHONE_FORMAT",
            ContactInfoError::PhoneTooLong => "PHONE_TOO_LONG",
            ContactInfoError::InvalidAddressFormat => "INVALID_ADDRESS_FORMAT",
            ContactInfoError::AddressTooLong => "ADDRESS_TOO_LONG",
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactInfo {
    email: String,
    phone: String,
    address: Option<String>,
}

impl ContactInfo {
    pub fn create(email: &str, phone: &str, address: Option<&str>) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();

        if email.is_empty() {
            errors.push(ContactInfoError::EmptyEmail);
        } else if email.len() > MAX_EMAIL_LENGTH {
            errors.push(ContactInfoError::EmailTooLong);
        } else if !EMAIL_RE.is_match(email) {
            errors.push(ContactInfoError::InvalidEmailFormat);
        }

        let digits = phone.strip_prefix('+').unwrap_or(phone);
        if phone.is_empty() {
            errors.push(ContactInfoError::EmptyPhone);
        } else if digits.len() > MAX_PHONE_DIGITS {
            errors.push(ContactInfoError::PhoneTooLong);
        } else if !PHONE_RE.is_match(phone) {
            errors.push(ContactInfoError::InvalidPhoneFormat);
        }

        let address = address.map(str::trim).filter(|a| !a.is_empty());
        if let Some(address) = address {
            if address.chars().count() > MAX_ADDRESS_LENGTH {
                errors.push(ContactInfoError::AddressTooLong);
            } else if !ADDRESS_RE.is_match(address) {
                errors.push(ContactInfoError::InvalidAddressFormat);
            }
        }

        errors.into_result(Self {
            email: email.to_string(),
            phone: phone.to_string(),
            address: address.map(str::to_string),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}
