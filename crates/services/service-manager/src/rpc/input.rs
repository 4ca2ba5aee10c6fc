//! Procedure input decoding.
//!
//! Bodies are decoded only after the procedure name has been resolved, so an
//! unknown procedure reports NOT_FOUND even when its body is garbage.

use axum::body::Bytes;
use serde::{de::DeserializeOwned, Deserialize};

use common::{AppError, AppResult};
use domain::ServiceIdInput;

/// Query-string input of GET procedures: `?id=<n>` or `?input={"id":<n>}`.
#[derive(Debug, Default, Deserialize)]
pub struct RpcQuery {
    pub id: Option<String>,
    pub input: Option<String>,
}

impl RpcQuery {
    /// The id input carried by the query string. `input` wins over `id`.
    pub fn id_input(&self) -> AppResult<ServiceIdInput> {
        if let Some(raw) = self.input.as_deref() {
            return serde_json::from_str(raw)
                .map_err(|e| AppError::bad_request(format!("Invalid input: {}", e)));
        }

        let id = self
            .id
            .as_deref()
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| AppError::bad_request(format!("Invalid id '{}'", raw)))
            })
            .transpose()?;

        Ok(ServiceIdInput { id })
    }
}

/// Decode a JSON mutation body. An empty body reads as `{}`.
pub fn decode_body<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_str("{}")
            .map_err(|e| AppError::bad_request(format!("Invalid input: {}", e)));
    }

    serde_json::from_slice(body).map_err(|e| AppError::bad_request(format!("Invalid input: {}", e)))
}
