//! Service procedures - the five CRUD operations behind the RPC transport.

mod service_procedures;

pub use service_procedures::{ServiceManager, ServiceProcedures};
