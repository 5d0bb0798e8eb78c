//! Lock-free intent queue
//!
//! Uses crossbeam-channel for lock-free MPSC communication from the
//! transport side to the simulation. Intents are drained in arrival order at
//! each tick boundary, so a later direction or boost update for the same
//! player overwrites an earlier one within the tick.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::net::protocol::Intent;

/// Bounded intent queue owned by the game loop
pub struct InputBuffer {
    /// Sender side - cloned into every `IntentSender`
    sender: Sender<Intent>,
    /// Receiver side - drained by the game loop
    receiver: Receiver<Intent>,
    capacity: usize,
}

impl InputBuffer {
    /// Create a new buffer with the given capacity
    ///
    /// Capacity should cover the intents arriving between two ticks
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Create a new sender handle for a producer
    pub fn sender(&self) -> IntentSender {
        IntentSender {
            sender: self.sender.clone(),
        }
    }

    /// Drain all pending intents, oldest first
    pub fn drain(&self) -> Vec<Intent> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        // ~100 players sending direction updates at 10 Hz
        Self::new(1000)
    }
}

/// Clonable submission handle
#[derive(Clone)]
pub struct IntentSender {
    sender: Sender<Intent>,
}

impl IntentSender {
    /// Submit an intent without blocking
    #[inline]
    pub fn try_send(&self, intent: Intent) -> Result<(), IntentError> {
        self.sender.try_send(intent).map_err(|e| match e {
            TrySendError::Full(_) => IntentError::Full,
            TrySendError::Disconnected(_) => IntentError::Disconnected,
        })
    }
}

/// Intent submission errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    /// Queue is full (backpressure)
    #[error("intent queue is full")]
    Full,
    /// Simulation has stopped
    #[error("simulation is no longer running")]
    Disconnected,
}
