use std::sync::{Arc, Mutex, MutexGuard};

use super::types::Interaction;

type Shared = Arc<Mutex<Vec<Interaction>>>;

/// Receiving end, owned by the renderer and drained once per frame.
#[derive(Debug, Default)]
pub struct InteractionQueue {
    pending: Shared,
}

/// Cloneable producer handle. May be used from any thread.
#[derive(Debug, Clone)]
pub struct InteractionSender {
    pending: Shared,
}

impl InteractionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> InteractionSender {
        InteractionSender {
            pending: Arc::clone(&self.pending),
        }
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&self) -> Vec<Interaction> {
        std::mem::take(&mut *lock(&self.pending))
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.pending).is_empty()
    }
}

impl InteractionSender {
    pub fn send(&self, event: Interaction) {
        lock(&self.pending).push(event);
    }

    pub fn pan(&self, dx: f32, dy: f32) {
        self.send(Interaction::Pan { dx, dy });
    }

    pub fn tap(&self, x: f32, y: f32) {
        self.send(Interaction::Tap { x, y });
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.send(Interaction::Resize { width, height });
    }
}

// A producer that panicked mid-push leaves a valid Vec behind; keep going.
fn lock(pending: &Shared) -> MutexGuard<'_, Vec<Interaction>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
