use crate::{AppState, relay::Relay};
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Upgrades `/ws` and hands the socket to the relay.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.relay))
}

/// Registers the connection, fans its frames out to every other peer, and
/// unregisters it once either direction closes.
async fn handle_socket(socket: WebSocket, relay: Arc<Relay>) {
    let (id, mut rx) = relay.register().await;
    info!("A user connected: {}", id);

    // Split the WebSocket into a sender and receiver.
    let (mut sender, mut receiver) = socket.split();

    // Task to forward frames relayed from other connections to this client.
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    // Task to relay frames from this client to everyone else.
    let mut recv_task = tokio::spawn({
        let relay = relay.clone();
        let id = id.clone();
        async move {
            while let Some(frame) = receiver.next().await {
                match frame {
                    Ok(msg @ (Message::Text(_) | Message::Binary(_))) => {
                        let delivered = relay.relay(&id, msg).await;
                        trace!("Relayed frame from {} to {} peers", id, delivered);
                    }
                    Ok(Message::Close(_)) => break,
                    // Pings are answered by axum.
                    Ok(_) => {}
                    Err(e) => {
                        debug!("WebSocket error on {}: {}", id, e);
                        break;
                    }
                }
            }
        }
    });

    // Wait for either task to finish. If one does, the other should be aborted.
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    relay.unregister(&id).await;
    info!("A user disconnected: {}", id);
}
