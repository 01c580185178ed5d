use avia_core::{ContactInfo, PassportNumber, ValidationErrors, ValidationResult};
use serde::Serialize;
use uuid::Uuid;

const MAX_NAME_LENGTH: usize = 100;

/// A traveller. Tickets refer to passengers by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passenger {
    pub id: Uuid,
    name: String,
    contact: ContactInfo,
    passport: PassportNumber,
}

impl Passenger {
    pub fn new(name: &str, contact: ContactInfo, passport: PassportNumber) -> ValidationResult<Self> {
        Self::with_id(Uuid::new_v4(), name, contact, passport)
    }

    /// Rebuilds a stored passenger under its existing id.
    pub fn with_id(
        id: Uuid,
        name: &str,
        contact: ContactInfo,
        passport: PassportNumber,
    ) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();
        Self::check_name(name, &mut errors);
        errors.into_result(Self {
            id,
            name: name.trim().to_string(),
            contact,
            passport,
        })
    }

    /// Validates every field from raw input, reporting all problems at once.
    pub fn create(
        name: &str,
        email: &str,
        phone: &str,
        address: Option<&str>,
        passport: &str,
    ) -> ValidationResult<Self> {
        let mut errors = ValidationErrors::new();
        Self::check_name(name, &mut errors);
        let contact = errors.absorb(ContactInfo::create(email, phone, address));
        let passport = errors.absorb(PassportNumber::create(passport));

        match (contact, passport) {
            (Some(contact), Some(passport)) if errors.is_empty() => Self::new(name, contact, passport),
            _ => Err(errors),
        }
    }

    fn check_name(name: &str, errors: &mut ValidationErrors) {
        let name = name.trim();
        if name.is_empty() {
            errors.add("name", "Name cannot be empty", "EMPTY_NAME");
        } else if name.chars().count() > MAX_NAME_LENGTH {
            errors.add("name", "Name must not exceed 100 characters", "NAME_TOO_LONG");
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn passport(&self) -> &PassportNumber {
        &self.passport
    }
}
