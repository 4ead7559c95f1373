//! WebSocket upgrade handler.
//!
//! Browsers cannot attach headers to WebSocket requests, so the access
//! token arrives as a query parameter and is verified before upgrade.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use crate::dto::WsQuery;
use crate::error::ApiError;
use crate::extractors::auth::decode_token;
use crate::state::AppState;

/// GET /ws?token={jwt} — WebSocket upgrade.
pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let claims = decode_token(&state.config.auth, &query.token)?;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, claims, socket)))
}

/// Drives an established WebSocket connection until it closes.
async fn handle_ws_connection(
    state: AppState,
    claims: crate::extractors::auth::AccessClaims,
    socket: WebSocket,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state
        .hub
        .register(claims.sub, claims.role, claims.name.clone());
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        user_id = %claims.sub,
        "WebSocket connection established"
    );

    // Outbound: serialize hub events into text frames.
    let outbound_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(t) => t,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize outbound event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound: room joins and pings.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state.hub.handle_client_message(&conn_id, text.as_str());
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.hub.unregister(&conn_id);

    info!(
        conn_id = %conn_id,
        user_id = %claims.sub,
        "WebSocket connection closed"
    );
}
