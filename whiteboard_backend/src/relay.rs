use axum::extract::ws::Message;
use nanoid::nanoid;
use std::{collections::HashMap, fmt};
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

/// Identifies one open WebSocket connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    fn generate() -> Self {
        Self(nanoid!(10))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The registry of open connections.
/// Each connection owns the receiving half of its channel; the relay keeps
/// the sending half and fans frames out to everyone but the originator.
#[derive(Debug, Default)]
pub struct Relay {
    peers: Mutex<HashMap<ConnectionId, mpsc::UnboundedSender<Message>>>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection and returns its id and the stream of frames relayed to it.
    pub async fn register(&self) -> (ConnectionId, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut peers = self.peers.lock().await;
        let mut id = ConnectionId::generate();
        while peers.contains_key(&id) {
            id = ConnectionId::generate();
        }
        peers.insert(id.clone(), tx);
        (id, rx)
    }

    /// Removes a connection. Returns whether it was registered.
    pub async fn unregister(&self, id: &ConnectionId) -> bool {
        self.peers.lock().await.remove(id).is_some()
    }

    /// Forwards `message` unchanged to every connection except `from`.
    ///
    /// Returns how many peers it was delivered to. Peers whose receiver is
    /// gone are dropped from the registry.
    pub async fn relay(&self, from: &ConnectionId, message: Message) -> usize {
        let mut delivered = 0;
        let mut peers = self.peers.lock().await;
        peers.retain(|id, tx| {
            if id == from {
                return true;
            }
            match tx.send(message.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    debug!("Dropping closed connection {}", id);
                    false
                }
            }
        });
        delivered
    }

    pub async fn peer_count(&self) -> usize {
        self.peers.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_LINE: &str =
        r##"{"draw":{"x0":0,"y0":0,"x1":10,"y1":10,"color":"#ff0000","brushSize":4}}"##;

    #[tokio::test]
    async fn relays_to_everyone_but_the_sender() {
        let relay = Relay::new();
        let (a, mut rx_a) = relay.register().await;
        let (_b, mut rx_b) = relay.register().await;
        let (_c, mut rx_c) = relay.register().await;

        let delivered = relay.relay(&a, Message::Text(RED_LINE.into())).await;
        assert_eq!(delivered, 2);

        for rx in [&mut rx_b, &mut rx_c] {
            match rx.try_recv() {
                Ok(Message::Text(text)) => assert_eq!(text.as_str(), RED_LINE),
                other => panic!("unexpected frame: {other:?}"),
            }
        }
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn payload_is_not_validated() {
        let relay = Relay::new();
        let (a, _rx_a) = relay.register().await;
        let (_b, mut rx_b) = relay.register().await;

        relay.relay(&a, Message::Text("not json at all".into())).await;
        relay.relay(&a, Message::Binary(vec![0xde, 0xad].into())).await;

        assert!(matches!(rx_b.try_recv(), Ok(Message::Text(t)) if t.as_str() == "not json at all"));
        assert!(matches!(rx_b.try_recv(), Ok(Message::Binary(b)) if b[..] == [0xde, 0xad]));
    }

    #[tokio::test]
    async fn lone_sender_reaches_nobody() {
        let relay = Relay::new();
        let (a, mut rx_a) = relay.register().await;
        assert_eq!(relay.relay(&a, Message::Text(RED_LINE.into())).await, 0);
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregistered_peers_stop_receiving() {
        let relay = Relay::new();
        let (a, _rx_a) = relay.register().await;
        let (b, _rx_b) = relay.register().await;
        assert_eq!(relay.peer_count().await, 2);

        assert!(relay.unregister(&b).await);
        assert!(!relay.unregister(&b).await);
        assert_eq!(relay.relay(&a, Message::Text(RED_LINE.into())).await, 0);
        assert_eq!(relay.peer_count().await, 1);
    }

    #[tokio::test]
    async fn closed_receivers_are_pruned() {
        let relay = Relay::new();
        let (a, _rx_a) = relay.register().await;
        let (_b, rx_b) = relay.register().await;
        drop(rx_b);

        assert_eq!(relay.relay(&a, Message::Text(RED_LINE.into())).await, 0);
        assert_eq!(relay.peer_count().await, 1);
    }
}
