//! HTTP handler for record updates
//!
//! This is the only layer that knows about status codes. Each request runs
//! through:
//!
//! ```text
//! Received -> DecodeFailed                                (400)
//!          -> Decoded -> Dispatched -> ServiceError       (500)
//!                                   -> NotFound           (404)
//!                                   -> Updated            (200)
//! ```
//!
//! The body is decoded from its bytes whatever the `Content-Type` says.
//!
//! Every terminal state is a variant of [`UpdateResponse`], so every path
//! produces exactly one response.

use std::io;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::put;
use axum::{Json, Router};
use registro_core::{Error, NationalId, RecordUpdate};
use registro_service::UpdateService;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Update route; the path segment is the national id.
pub const UPDATE_ROUTE: &str = "/update/update-by-cedula/:cedula";

/// Body text for a request whose JSON could not be decoded.
pub const MSG_DECODE_FAILED: &str = "Error al decodificar JSON";
/// Body text for a store failure.
pub const MSG_UPDATE_FAILED: &str = "Error al actualizar usuario";
/// Body text when no record has the requested key.
pub const MSG_NOT_FOUND: &str = "No se encontró ningún usuario con esa cédula";
/// `message` of a successful update.
pub const MSG_UPDATED: &str = "Usuario actualizado correctamente";

#[derive(Clone)]
struct AppState {
    service: Arc<dyn UpdateService>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// Terminal state of one update request.
#[derive(Debug)]
pub enum UpdateResponse {
    /// Body was not a decodable update
    DecodeFailed(serde_json::Error),
    /// The service reported a failure
    ServiceError(Error),
    /// No record matched the key
    NotFound,
    /// The record was updated
    Updated,
}

impl UpdateResponse {
    /// Status code for this outcome.
    pub fn status(&self) -> StatusCode {
        match self {
            UpdateResponse::DecodeFailed(_) => StatusCode::BAD_REQUEST,
            UpdateResponse::ServiceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UpdateResponse::NotFound => StatusCode::NOT_FOUND,
            UpdateResponse::Updated => StatusCode::OK,
        }
    }
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            UpdateResponse::DecodeFailed(_) => (status, MSG_DECODE_FAILED).into_response(),
            UpdateResponse::ServiceError(_) => (status, MSG_UPDATE_FAILED).into_response(),
            UpdateResponse::NotFound => (status, MSG_NOT_FOUND).into_response(),
            UpdateResponse::Updated => (
                status,
                Json(MessageResponse {
                    message: MSG_UPDATED,
                }),
            )
                .into_response(),
        }
    }
}

async fn update_by_cedula(
    State(state): State<AppState>,
    Path(cedula): Path<String>,
    body: Bytes,
) -> UpdateResponse {
    let national_id = NationalId::from(cedula);
    info!(target: "registro::http", cedula = %national_id, "Update request received");

    let update = match serde_json::from_slice::<RecordUpdate>(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(
                target: "registro::http",
                cedula = %national_id,
                reason = %e,
                "Update body could not be decoded"
            );
            return UpdateResponse::DecodeFailed(e);
        }
    };
    debug!(target: "registro::http", cedula = %national_id, payload = ?update, "Update payload decoded");

    match state.service.update_by_national_id(&national_id, update).await {
        Err(e) => {
            error!(target: "registro::http", cedula = %national_id, error = %e, "Update failed");
            UpdateResponse::ServiceError(e)
        }
        Ok(outcome) if outcome.is_not_found() => {
            info!(target: "registro::http", cedula = %national_id, "No record for national id");
            UpdateResponse::NotFound
        }
        Ok(outcome) => {
            info!(
                target: "registro::http",
                cedula = %national_id,
                modified = outcome.modified,
                "Record updated"
            );
            UpdateResponse::Updated
        }
    }
}

/// Router exposing the update endpoint over `service`.
pub fn router(service: Arc<dyn UpdateService>) -> Router {
    Router::new()
        .route(UPDATE_ROUTE, put(update_by_cedula))
        .with_state(AppState { service })
}

/// Serve `app` on an already-bound listener until the process stops.
pub async fn serve(listener: TcpListener, app: Router) -> io::Result<()> {
    let addr = listener.local_addr()?;
    info!(target: "registro::server", %addr, "Listening on http://{}", addr);
    axum::serve(listener, app).await
}
