//! Batch validation results.
//!
//! Factories never stop at the first problem: every independent violation
//! is pushed into a [`ValidationErrors`] and returned together.

use serde::Serialize;
use std::fmt;

/// One field-level failure: which field, what went wrong, and a stable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
    pub code: &'static str,
}

/// Implemented by the per-primitive error enums so they can be pushed
/// straight into a batch.
pub trait FieldError {
    fn field(&self) -> &'static str;
    fn code(&self) -> &'static str;
    fn message(&self) -> String;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

pub type ValidationResult<T> = Result<T, ValidationErrors>;

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>, code: &'static str) {
        self.errors.push(ValidationError {
            field,
            message: message.into(),
            code,
        });
    }

    pub fn push<E: FieldError>(&mut self, error: E) {
        self.add(error.field(), error.message(), error.code());
    }

    /// Appends every error of `other`, for validating composite inputs.
    pub fn combine(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Folds a sub-result into this batch, returning the value if it was valid.
    pub fn absorb<T>(&mut self, result: ValidationResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.combine(errors);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// `"field: message; field: message"`
    pub fn messages(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `"CODE;CODE"`
    pub fn codes(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.code)
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn into_result<T>(self, value: T) -> ValidationResult<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_codes_are_joined() {
        let mut errors = ValidationErrors::new();
        errors.add("price", "Amount cannot be negative", "NEGATIVE_AMOUNT");
        errors.add("price", "Unknown currency", "INVALID_CURRENCY");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.messages(),
            "price: Amount cannot be negative; price: Unknown currency"
        );
        assert_eq!(errors.codes(), "NEGATIVE_AMOUNT;INVALID_CURRENCY");
        assert!(errors.has_code("INVALID_CURRENCY"));
    }

    #[test]
    fn test_combine_and_absorb() {
        let mut outer = ValidationErrors::new();
        let mut inner = ValidationErrors::new();
        inner.add("route", "Route cannot be empty", "EMPTY_ROUTE");

        assert_eq!(outer.absorb::<u8>(Ok(7)), Some(7));
        assert_eq!(outer.absorb::<u8>(Err(inner)), None);
        assert_eq!(outer.codes(), "EMPTY_ROUTE");
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationErrors::new().into_result(1), Ok(1));

        let mut errors = ValidationErrors::new();
        errors.add("x", "bad", "BAD");
        assert!(errors.into_result(1).is_err());
    }
}
