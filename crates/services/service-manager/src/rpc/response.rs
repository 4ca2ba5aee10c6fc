//! Success envelope.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `{"result":{"data": T}}`
#[derive(Debug, Serialize)]
pub struct RpcResponse<T> {
    result: RpcResult<T>,
}

#[derive(Debug, Serialize)]
struct RpcResult<T> {
    data: T,
}

impl<T> RpcResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            result: RpcResult { data },
        }
    }
}

impl<T: Serialize> IntoResponse for RpcResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
