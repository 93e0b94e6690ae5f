//! Observer registration with cancellation on drop.

use std::sync::{Arc, Mutex};

use futures::channel::mpsc;
use futures::{FutureExt, StreamExt};
use lineup_model::RowId;

use crate::body::RenderReason;

struct Listener<E> {
    id: usize,
    tx: mpsc::UnboundedSender<E>,
}

struct BusInner<E> {
    next_id: usize,
    listeners: Vec<Listener<E>>,
}

/// Broadcasts events to every live [`Subscription`].
///
/// Cloning yields another handle to the same set of listeners.
pub struct EventBus<E> {
    inner: Arc<Mutex<BusInner<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Dropping the returned subscription removes it.
    pub fn subscribe(&self) -> Subscription<E> {
        let (tx, rx) = mpsc::unbounded();
        let id = match self.inner.lock() {
            Ok(mut guard) => {
                let id = guard.next_id;
                guard.next_id += 1;
                guard.listeners.push(Listener { id, tx });
                id
            }
            Err(_) => usize::MAX,
        };
        Subscription {
            id,
            rx,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Sends `event` to every listener, dropping listeners whose
    /// subscription is gone.
    pub fn emit(&self, event: E) {
        if let Ok(mut guard) = self.inner.lock() {
            guard
                .listeners
                .retain(|listener| listener.tx.unbounded_send(event.clone()).is_ok());
        }
    }
}

impl<E> EventBus<E> {
    pub fn listener_count(&self) -> usize {
        self.inner
            .lock()
            .map(|guard| guard.listeners.len())
            .unwrap_or(0)
    }
}

/// Receiving end of an [`EventBus`] registration.
pub struct Subscription<E> {
    id: usize,
    rx: mpsc::UnboundedReceiver<E>,
    bus: std::sync::Weak<Mutex<BusInner<E>>>,
}

impl<E> Subscription<E> {
    /// Next pending event, without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.next().now_or_never().flatten()
    }

    /// Waits for the next event. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.next().await
    }

    /// Takes every pending event.
    pub fn drain(&mut self) -> Vec<E> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        if let Ok(mut guard) = bus.lock() {
            guard.listeners.retain(|listener| listener.id != self.id);
        };
    }
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Notifications from a body renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyEvent {
    /// The hovered row changed; `None` when the pointer left all rows.
    HoverChanged(Option<RowId>),
    /// Rows selected after a selection toggle.
    SelectionChanged(Vec<RowId>),
    /// A frame was composed.
    RenderFinished {
        reason: RenderReason,
        width: f64,
        height: f64,
    },
}
