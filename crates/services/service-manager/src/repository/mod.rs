//! Repository layer for data access.

pub mod entities;
mod service_repository;

#[cfg(any(test, feature = "test-utils"))]
pub use service_repository::MockServiceRepository;
pub use service_repository::{ServiceRepository, ServiceStore};
