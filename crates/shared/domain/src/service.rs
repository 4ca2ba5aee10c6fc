//! Service domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{STATUS_CANCELLED, STATUS_COMPLETED, STATUS_PENDING};
use crate::error::DomainError;

/// Service status enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => STATUS_PENDING,
            ServiceStatus::Completed => STATUS_COMPLETED,
            ServiceStatus::Cancelled => STATUS_CANCELLED,
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(ServiceStatus::Pending),
            STATUS_COMPLETED => Ok(ServiceStatus::Completed),
            STATUS_CANCELLED => Ok(ServiceStatus::Cancelled),
            other => Err(DomainError::internal(format!("Unknown service status '{}'", other))),
        }
    }
}

impl From<ServiceStatus> for String {
    fn from(status: ServiceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Service domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i32,
    pub customer_name: String,
    pub service_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub price: f64,
    pub status: ServiceStatus,
}

impl Service {
    /// Build the entity from a validated creation payload and a store-assigned id
    pub fn from_new(id: i32, new: NewService) -> Self {
        Self {
            id,
            customer_name: new.customer_name,
            service_type: new.service_type,
            scheduled_at: new.scheduled_at,
            price: new.price,
            status: new.status,
        }
    }

    /// Merge supplied fields over this service. Absent fields are untouched.
    pub fn apply(&mut self, changes: ServiceChanges) {
        if let Some(customer_name) = changes.customer_name {
            self.customer_name = customer_name;
        }
        if let Some(service_type) = changes.service_type {
            self.service_type = service_type;
        }
        if let Some(scheduled_at) = changes.scheduled_at {
            self.scheduled_at = scheduled_at;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }

    /// Consuming variant of [`Service::apply`]
    pub fn merged(mut self, changes: ServiceChanges) -> Self {
        self.apply(changes);
        self
    }
}

/// Validated creation payload (no id yet)
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub customer_name: String,
    pub service_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub price: f64,
    pub status: ServiceStatus,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceChanges {
    pub customer_name: Option<String>,
    pub service_type: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub status: Option<ServiceStatus>,
}

impl ServiceChanges {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.service_type.is_none()
            && self.scheduled_at.is_none()
            && self.price.is_none()
            && self.status.is_none()
    }
}

/// Acknowledgement returned by delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteServiceResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteServiceResponse {
    pub fn deleted() -> Self {
        Self {
            success: true,
            message: "Service deleted successfully".to_string(),
        }
    }
}
