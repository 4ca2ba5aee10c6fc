//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the `Service` entity, its status, the input schemas and their validation.

pub mod constants;
pub mod error;
pub mod service;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, FieldError, FieldErrors};
pub use service::{DeleteServiceResponse, NewService, Service, ServiceChanges, ServiceStatus};
pub use validation::{
    validate_create, validate_id, validate_update, CreateServiceInput, ServiceIdInput,
    UpdateServiceInput, UpdateServiceRequest,
};
