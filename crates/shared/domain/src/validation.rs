//! Input schemas and pure validation functions.
//!
//! Raw inputs keep every field optional so that a missing field is reported
//! as a field error instead of a decode failure. Validation turns a raw input
//! into a typed value or a list of [`FieldErrors`], without touching any I/O.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::is_valid_status;
use crate::error::{FieldError, FieldErrors};
use crate::service::{NewService, ServiceChanges, ServiceStatus};

/// Raw creation payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceInput {
    #[validate(
        required(message = "Customer name is required"),
        length(min = 1, max = 255, message = "Customer name must be between 1 and 255 characters")
    )]
    pub customer_name: Option<String>,

    #[validate(
        required(message = "Service type is required"),
        length(min = 1, max = 255, message = "Service type must be between 1 and 255 characters")
    )]
    pub service_type: Option<String>,

    #[validate(
        required(message = "Scheduled date is required"),
        custom(function = "validate_timestamp")
    )]
    pub scheduled_at: Option<String>,

    #[validate(
        required(message = "Price is required"),
        range(min = 0.01, max = 99999999.99, message = "Price must be between 0.01 and 99999999.99")
    )]
    pub price: Option<f64>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

/// Raw partial update payload. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceInput {
    #[validate(length(min = 1, max = 255, message = "Customer name must be between 1 and 255 characters"))]
    pub customer_name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Service type must be between 1 and 255 characters"))]
    pub service_type: Option<String>,

    #[validate(custom(function = "validate_timestamp"))]
    pub scheduled_at: Option<String>,

    #[validate(range(min = 0.01, max = 99999999.99, message = "Price must be between 0.01 and 99999999.99"))]
    pub price: Option<f64>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
}

/// Payload carrying only an id (`getService`, `deleteService`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceIdInput {
    pub id: Option<i64>,
}

impl ServiceIdInput {
    /// The supplied id, or a field error when absent
    pub fn required(&self) -> Result<i64, FieldErrors> {
        self.id.ok_or_else(|| FieldErrors::single("id", "Id is required"))
    }
}

/// Payload of `updateService`: the id plus the partial fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServiceRequest {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub changes: UpdateServiceInput,
}

// =============================================================================
// Validation entry points
// =============================================================================

/// Validate a creation payload. `status` defaults to pending.
pub fn validate_create(input: &CreateServiceInput) -> Result<NewService, FieldErrors> {
    input.validate().map_err(collect_errors)?;

    Ok(NewService {
        customer_name: required(&input.customer_name, "customerName")?,
        service_type: required(&input.service_type, "serviceType")?,
        scheduled_at: parse_field_timestamp(&required(&input.scheduled_at, "scheduledAt")?)?,
        price: required(&input.price, "price")?,
        status: parse_field_status(input.status.as_deref())?.unwrap_or_default(),
    })
}

/// Validate a partial update payload. An empty payload yields empty changes.
pub fn validate_update(input: &UpdateServiceInput) -> Result<ServiceChanges, FieldErrors> {
    input.validate().map_err(collect_errors)?;

    let scheduled_at = match input.scheduled_at.as_deref() {
        Some(raw) => Some(parse_field_timestamp(raw)?),
        None => None,
    };

    Ok(ServiceChanges {
        customer_name: input.customer_name.clone(),
        service_type: input.service_type.clone(),
        scheduled_at,
        price: input.price,
        status: parse_field_status(input.status.as_deref())?,
    })
}

/// Validate an entity id: positive and within the store's integer range.
pub fn validate_id(id: i64) -> Result<i32, FieldErrors> {
    if id <= 0 {
        return Err(FieldErrors::single("id", "Id must be a positive integer"));
    }
    i32::try_from(id).map_err(|_| FieldErrors::single("id", "Id is out of range"))
}

/// Parse an RFC 3339 timestamp. Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Helpers
// =============================================================================

fn validate_timestamp(raw: &str) -> Result<(), ValidationError> {
    match parse_timestamp(raw) {
        Some(_) => Ok(()),
        None => Err(invalid("timestamp", "Scheduled date must be a valid ISO 8601 timestamp")),
    }
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if is_valid_status(status) {
        Ok(())
    } else {
        Err(invalid(
            "status",
            "Status must be one of 'pending', 'completed' or 'cancelled'",
        ))
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn required<T: Clone>(value: &Option<T>, field: &str) -> Result<T, FieldErrors> {
    value
        .clone()
        .ok_or_else(|| FieldErrors::single(field, "Field is required"))
}

fn parse_field_timestamp(raw: &str) -> Result<DateTime<Utc>, FieldErrors> {
    parse_timestamp(raw).ok_or_else(|| {
        FieldErrors::single("scheduledAt", "Scheduled date must be a valid ISO 8601 timestamp")
    })
}

fn parse_field_status(raw: Option<&str>) -> Result<Option<ServiceStatus>, FieldErrors> {
    raw.map(|s| {
        s.parse::<ServiceStatus>()
            .map_err(|_| FieldErrors::single("status", "Invalid status"))
    })
    .transpose()
}

/// Flatten `validator` output into wire-named field errors.
fn collect_errors(errors: ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let name = camel_case(&field);
        for error in field_errors.iter() {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {}", name));
            out.push(FieldError::new(name.clone(), message));
        }
    }
    out.sorted()
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
