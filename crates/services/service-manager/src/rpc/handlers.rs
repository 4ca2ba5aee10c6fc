//! Procedure dispatch.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use common::{AppError, AppResult};
use domain::{CreateServiceInput, ServiceIdInput, UpdateServiceRequest};

use super::input::{decode_body, RpcQuery};
use super::response::RpcResponse;
use super::state::AppState;

const QUERIES: [&str; 2] = ["getServices", "getService"];
const MUTATIONS: [&str; 3] = ["createService", "updateService", "deleteService"];

fn unresolved(procedure: String) -> AppError {
    if QUERIES.contains(&procedure.as_str()) || MUTATIONS.contains(&procedure.as_str()) {
        AppError::MethodNotSupported(procedure)
    } else {
        AppError::ProcedureNotFound(procedure)
    }
}

/// GET `/api/trpc/:procedure`
pub async fn query(
    State(state): State<AppState>,
    Path(procedure): Path<String>,
    Query(params): Query<RpcQuery>,
) -> AppResult<Response> {
    match procedure.as_str() {
        "getServices" => {
            let services = state.procedures.list().await?;
            Ok(RpcResponse::new(services).into_response())
        }
        "getService" => {
            let id = params.id_input()?.required()?;
            let service = state.procedures.get_by_id(id).await?;
            Ok(RpcResponse::new(service).into_response())
        }
        _ => Err(unresolved(procedure)),
    }
}

/// POST `/api/trpc/:procedure`
pub async fn mutation(
    State(state): State<AppState>,
    Path(procedure): Path<String>,
    body: Bytes,
) -> AppResult<Response> {
    match procedure.as_str() {
        "createService" => {
            let input: CreateServiceInput = decode_body(&body)?;
            let service = state.procedures.create(input).await?;
            Ok(RpcResponse::new(service).into_response())
        }
        "updateService" => {
            let request: UpdateServiceRequest = decode_body(&body)?;
            let id = ServiceIdInput { id: request.id }.required()?;
            let service = state.procedures.update(id, request.changes).await?;
            Ok(RpcResponse::new(service).into_response())
        }
        "deleteService" => {
            let input: ServiceIdInput = decode_body(&body)?;
            let ack = state.procedures.delete(input.required()?).await?;
            Ok(RpcResponse::new(ack).into_response())
        }
        _ => Err(unresolved(procedure)),
    }
}

/// Any other verb on `/api/trpc/:procedure`
pub async fn unsupported_method(Path(procedure): Path<String>) -> AppError {
    unresolved(procedure)
}
