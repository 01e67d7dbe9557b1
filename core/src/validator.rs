//! Intake payload validation.
//!
//! Implements the parse-then-validate boundary: the front door deserializes
//! the raw request into an untyped [`serde_json::Value`], and [`validate`]
//! turns it into a strongly-typed [`TicketRequest`] or a single typed error
//! naming the first offending field. Unvalidated data never reaches the
//! eligibility engine or the store.
//!
//! Rules are applied in order and the first failure wins (fail-fast, not
//! accumulate-all), matching the caller-facing contract: one actionable
//! message per rejected payload.

use crate::types::{Address, Device, TicketRequest};
use serde_json::Value;
use thiserror::Error;

/// Validation failure for an intake payload.
///
/// Always a caller error: the payload must be corrected and resubmitted,
/// never retried as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required top-level field is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A top-level field is present but has the wrong shape.
    #[error("field '{field}' must be {expected}")]
    WrongShape {
        /// The offending field
        field: &'static str,
        /// The expected shape ("a string" or "an object")
        expected: &'static str,
    },

    /// A required address sub-field is absent.
    #[error("missing required address field: {0}")]
    MissingAddressField(&'static str),

    /// A required device sub-field is absent.
    #[error("missing required device field: {0}")]
    MissingDeviceField(&'static str),

    /// National ID does not normalize to exactly 11 decimal digits.
    #[error("national id must contain exactly 11 digits")]
    InvalidNationalId,

    /// Email lacks an `@` separator or a `.` in the domain portion.
    #[error("email address is malformed")]
    InvalidEmail,
}

const ADDRESS_FIELDS: [&str; 5] = ["street", "number", "city", "state", "postal_code"];
const DEVICE_FIELDS: [&str; 5] = [
    "brand",
    "model",
    "serial_number",
    "purchase_date",
    "invoice_reference",
];

/// Validate a raw intake payload into a [`TicketRequest`].
///
/// Pure function over its argument: safe to call repeatedly and
/// concurrently, no side effects.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, in rule order:
/// top-level presence and shape, address sub-fields, device sub-fields,
/// national ID format, email format.
pub fn validate(payload: &Value) -> Result<TicketRequest, ValidationError> {
    let full_name = required_string(payload, "full_name")?;
    let national_id = required_string(payload, "national_id")?;
    let email = required_string(payload, "email")?;
    let phone = required_string(payload, "phone")?;
    let address = required_object(payload, "address")?;
    let device = required_object(payload, "device")?;

    for field in ADDRESS_FIELDS {
        if !address.contains_key(field) {
            return Err(ValidationError::MissingAddressField(field));
        }
    }
    for field in DEVICE_FIELDS {
        if !device.contains_key(field) {
            return Err(ValidationError::MissingDeviceField(field));
        }
    }

    validate_national_id(&national_id)?;
    validate_email(&email)?;

    let notes = payload
        .get("notes")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(TicketRequest {
        full_name,
        national_id,
        email,
        phone,
        address: Address {
            street: sub_field(address, "street"),
            number: sub_field(address, "number"),
            city: sub_field(address, "city"),
            state: sub_field(address, "state"),
            postal_code: sub_field(address, "postal_code"),
        },
        device: Device {
            brand: sub_field(device, "brand"),
            model: sub_field(device, "model"),
            serial_number: sub_field(device, "serial_number"),
            purchase_date: sub_field(device, "purchase_date"),
            invoice_reference: sub_field(device, "invoice_reference"),
        },
        notes,
    })
}

fn required_string(payload: &Value, field: &'static str) -> Result<String, ValidationError> {
    let value = payload
        .get(field)
        .ok_or(ValidationError::MissingField(field))?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(ValidationError::WrongShape {
            field,
            expected: "a string",
        })
}

fn required_object<'a>(
    payload: &'a Value,
    field: &'static str,
) -> Result<&'a serde_json::Map<String, Value>, ValidationError> {
    let value = payload
        .get(field)
        .ok_or(ValidationError::MissingField(field))?;
    value.as_object().ok_or(ValidationError::WrongShape {
        field,
        expected: "an object",
    })
}

/// Extract a sub-field as a string.
///
/// Sub-fields are checked by key presence only, so a non-string value is
/// carried along stringified rather than rejected; downstream eligibility
/// rules handle values that turn out to be unusable.
fn sub_field(object: &serde_json::Map<String, Value>, field: &str) -> String {
    match object.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn validate_national_id(national_id: &str) -> Result<(), ValidationError> {
    let digits: String = national_id
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .collect();
    if digits.len() == 11 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidNationalId)
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    match email.split_once('@') {
        Some((_, domain)) if domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidEmail),
    }
}
