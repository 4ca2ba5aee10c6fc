//! RPC transport: the five procedures over HTTP at `/api/trpc/{procedure}`.
//!
//! Queries are served on GET, mutations on POST. Successful calls answer
//! `{"result":{"data":...}}`; failures use the [`common::AppError`] envelope.

mod handlers;
mod input;
mod response;
mod routes;
mod state;

pub use input::RpcQuery;
pub use response::RpcResponse;
pub use routes::create_router;
pub use state::AppState;
