//! UI surface registry and one-way broadcast channel.
//!
//! The privileged process pushes messages to named UI surfaces over a
//! one-directional channel: at most once, fire and forget, no response
//! payload and no retry buffer. A surface that is not attached when a
//! message is sent simply never sees it.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

/// One message pushed to a UI surface under a named channel.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastMessage {
    pub channel: String,
    pub payload: Value,
}

/// Registry of live UI surfaces addressable by name.
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: RwLock<HashMap<String, UnboundedSender<BroadcastMessage>>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a surface and hand back its receiving end. Re-attaching a name
    /// replaces the previous handle.
    pub fn attach(&self, name: &str) -> UnboundedReceiver<BroadcastMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.surfaces.write().insert(name.to_string(), tx).is_some() {
            debug!(surface = %name, "replacing existing surface handle");
        }
        rx
    }

    /// Drop a surface handle. Messages broadcast afterwards are lost.
    pub fn detach(&self, name: &str) {
        self.surfaces.write().remove(name);
    }

    pub fn is_attached(&self, name: &str) -> bool {
        self.surfaces.read().contains_key(name)
    }

    /// Push one message to the addressed surface.
    ///
    /// Returns `true` only if the surface handle exists and the push itself
    /// succeeded. `false` means the message is gone: there is no queue for
    /// absent surfaces and no acknowledgement from the receiver. The result
    /// says nothing about whether anyone read the message.
    pub fn broadcast_to_surface<T: Serialize>(
        &self,
        surface: &str,
        channel: &str,
        payload: &T,
    ) -> bool {
        let payload = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(err) => {
                error!(surface = %surface, channel = %channel, error = %err, "failed to serialize broadcast payload");
                return false;
            }
        };

        let sender = match self.surfaces.read().get(surface) {
            Some(sender) => sender.clone(),
            None => {
                warn!(surface = %surface, channel = %channel, "target surface is not attached");
                return false;
            }
        };

        let message = BroadcastMessage {
            channel: channel.to_string(),
            payload,
        };

        if sender.send(message).is_err() {
            warn!(surface = %surface, channel = %channel, "target surface went away");
            return false;
        }

        true
    }
}
