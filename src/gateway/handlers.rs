use crate::telegram::{InboundUpdate, Update};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use tokio::sync::mpsc::error::TrySendError;

use super::{AppState, SECRET_HEADER};

/// GET /: liveness banner
pub(super) async fn handle_root() -> impl IntoResponse {
    Json(serde_json::json!({"status": "Polka Bot is running!"}))
}

/// GET /health: always public
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// POST /webhook: Telegram update ingestion
///
/// Anything that gets past the secret check is answered 200 so Telegram does
/// not redeliver it.
pub(super) async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if let Some(ref secret) = state.webhook_secret {
        let header_val = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        match header_val {
            Some(val) if constant_time_eq(val, secret.as_ref()) => {}
            _ => {
                tracing::warn!("webhook request rejected: missing or invalid secret token");
                let err = serde_json::json!({
                    "status": "error",
                    "message": format!("Unauthorized: missing or invalid {SECRET_HEADER} header")
                });
                return (StatusCode::UNAUTHORIZED, Json(err));
            }
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, bytes = body.len(), "malformed webhook payload");
            let err = serde_json::json!({"status": "error", "message": e.to_string()});
            return (StatusCode::OK, Json(err));
        }
    };

    let update_id = update.update_id;
    let Some(inbound) = InboundUpdate::from_update(update) else {
        tracing::debug!(update_id, "update carries no message, ignoring");
        return ok();
    };

    match state.updates.try_send(inbound) {
        Ok(()) => tracing::debug!(update_id, "update queued"),
        Err(TrySendError::Full(_)) => {
            tracing::error!(update_id, "update queue full, dropping update");
        }
        Err(TrySendError::Closed(_)) => {
            tracing::error!(update_id, "update worker stopped, dropping update");
        }
    }

    ok()
}

fn ok() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
