//! Input validation for customer records.
//!
//! Checks records before they enter the persisted store. Detects:
//! - Empty identifiers
//! - Duplicate identifiers
//! - Text fields that would corrupt the line-per-record file format
//!
//! Emergency levels are deliberately not checked here: out-of-range levels
//! are normalized by the queue, never rejected.

use std::collections::HashSet;

use crate::models::Customer;
use crate::store::FIELD_SEPARATOR;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The identifier is empty or whitespace.
    EmptyId,
    /// Two records share the same identifier.
    DuplicateId,
    /// A text field contains a line break or the field separator.
    UnsafeField,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a single customer record.
///
/// Checks:
/// 1. The identifier is not blank
/// 2. No field contains a line break
/// 3. No field except `notes` contains the `", "` separator
pub fn validate_customer(customer: &Customer) -> ValidationResult {
    let mut errors = Vec::new();
    check_record(customer, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a batch of records, including identifier uniqueness.
pub fn validate_customers(customers: &[Customer]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for customer in customers {
        if !ids.insert(customer.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate customer ID: {}", customer.id),
            ));
        }
        check_record(customer, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_record(customer: &Customer, errors: &mut Vec<ValidationError>) {
    if customer.id.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyId,
            "Customer has an empty ID",
        ));
    }

    let separated = [
        ("id", &customer.id),
        ("name", &customer.name),
        ("email", &customer.email),
        ("location", &customer.location),
    ];
    for (field, value) in separated {
        if value.contains(FIELD_SEPARATOR) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnsafeField,
                format!(
                    "Customer '{}' field '{field}' contains the separator {FIELD_SEPARATOR:?}",
                    customer.id
                ),
            ));
        }
    }

    for (field, value) in separated.into_iter().chain([("notes", &customer.notes)]) {
        if value.contains(['\n', '\r']) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnsafeField,
                format!("Customer '{}' field '{field}' contains a line break", customer.id),
            ));
        }
    }
}
