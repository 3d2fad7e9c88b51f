//! Event Emitter
//!
//! Fan-out of memory lifecycle events over in-process broadcast
//! channels. Delivery is fire-and-forget and at-most-once: emitting
//! never blocks the turn, a send with no subscribers is a no-op, and a
//! lagging subscriber drops the oldest events rather than slowing the
//! emitter.

use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};

use crate::domain::entities::MemoryEvent;

/// Buffered events per channel before a slow subscriber starts lagging.
const CHANNEL_CAPACITY: usize = 256;

pub struct EventEmitter {
    global: broadcast::Sender<MemoryEvent>,
    per_user: RwLock<HashMap<String, broadcast::Sender<MemoryEvent>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        let (global, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            global,
            per_user: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe to every event regardless of user.
    pub fn subscribe_all(&self) -> broadcast::Receiver<MemoryEvent> {
        self.global.subscribe()
    }

    /// Subscribe to events for a single user.
    pub async fn subscribe_user(&self, user_id: &str) -> broadcast::Receiver<MemoryEvent> {
        let mut channels = self.per_user.write().await;
        channels
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Emit an event to the global channel and the owning user's
    /// channel. Send errors mean nobody is listening and are dropped.
    pub async fn emit(&self, event: MemoryEvent) {
        tracing::debug!(
            kind = ?event.kind,
            user_id = %event.user_id,
            "emitting memory event"
        );
        let channels = self.per_user.read().await;
        if let Some(sender) = channels.get(&event.user_id) {
            let _ = sender.send(event.clone());
        }
        let _ = self.global.send(event);
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}
