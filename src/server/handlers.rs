//! HTTP request handlers.
//!
//! This module contains all the HTTP endpoint handlers for the control API.

use crate::server::response::{
    HealthResponse, MethodNotAllowedResponse, ServiceInfo, ServiceQuery, ServiceRequest,
    ServicesResponse,
};
use crate::server::state::AppState;
use crate::service::ActionResult;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Health check handler.
///
/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut services = Vec::new();
    for spec in state.manager.registry().enabled() {
        let status = state.manager.probe(spec).await;
        services.push(ServiceInfo::new(spec, status));
    }

    (StatusCode::OK, Json(HealthResponse::new(services)))
}

/// List services handler. Includes disabled services.
///
/// GET /services
pub async fn list_services(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut services = Vec::with_capacity(state.manager.registry().len());
    for spec in state.manager.registry().list() {
        let status = state.manager.probe(spec).await;
        services.push(ServiceInfo::new(spec, status));
    }

    (StatusCode::OK, Json(ServicesResponse { services }))
}

/// Single-service control handler.
///
/// GET|POST /service
pub async fn service_control(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let request = match method {
        Method::GET => ServiceRequest::from(parse_query(&uri)),
        Method::POST if state.strict_requests => match ServiceRequest::from_json(&body) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "Rejecting malformed request body");
                let result = ActionResult::failure("", "Malformed request", "", &err);
                return (StatusCode::BAD_REQUEST, Json(result)).into_response();
            }
        },
        Method::POST => ServiceRequest::from_body_lenient(&body),
        _ => {
            return (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(MethodNotAllowedResponse::default()),
            )
                .into_response();
        }
    };

    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        service = %request.service,
        action = %request.action,
        target = %request.target,
        "Processing service request"
    );

    let result = state
        .manager
        .dispatch(&request.service, &request.action, &request.target)
        .await;

    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    info!(
        request_id = %request_id,
        success = result.success,
        status = status.as_u16(),
        "Service request finished"
    );

    (status, Json(result)).into_response()
}

/// Decodes the query string without rejecting the request.
///
/// Repeated keys keep their first value. A query that cannot be decoded at
/// all is treated as empty, so defaults apply.
fn parse_query(uri: &Uri) -> ServiceQuery {
    match Query::<Vec<(String, String)>>::try_from_uri(uri) {
        Ok(Query(pairs)) => ServiceQuery::from_pairs(pairs),
        Err(err) => {
            warn!(error = %err, "Ignoring undecodable query string");
            ServiceQuery::default()
        }
    }
}
