use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use tracing::{info, warn};

use crate::state::AppState;

/// Streams order snapshots to UI clients so screens re-render on every
/// lifecycle or claim change without polling.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe before the snapshot so no update falls between the two.
    let mut rx = state.order_events_tx.subscribe();

    info!("websocket client connected");

    // Current orders first, then live updates.
    let snapshot: Vec<_> = state
        .orders
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    let send_task = tokio::spawn(async move {
        for order in snapshot {
            let Ok(json) = serde_json::to_string(&order) else {
                continue;
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }

        while let Ok(order) = rx.recv().await {
            let json = match serde_json::to_string(&order) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize order for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!("websocket client disconnected");
}
