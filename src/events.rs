use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::mpsc as tokio_mpsc;
use tracing::trace;

type SubscriptionId = u64;

struct Registry<T> {
    subscribers: HashMap<SubscriptionId, tokio_mpsc::UnboundedSender<T>>,
    next_id: SubscriptionId,
}

fn lock<T>(registry: &Mutex<Registry<T>>) -> MutexGuard<'_, Registry<T>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out of notifications to any number of subscribers
///
/// Publishing never blocks. Subscribers whose receiving side is gone are
/// pruned on the next publish.
pub struct Broadcaster<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<T> Default for Broadcaster<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Broadcaster<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                subscribers: HashMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Register a new subscriber. It stays registered until the returned
    /// `Subscription` is dropped.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = tokio_mpsc::unbounded_channel();
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.insert(id, tx);

        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).subscribers.len()
    }
}

impl<T: Clone> Broadcaster<T> {
    /// Deliver `value` to every live subscriber
    pub fn publish(&self, value: T) {
        let mut registry = lock(&self.registry);
        let mut to_remove = Vec::new();

        for (id, tx) in registry.subscribers.iter() {
            if tx.send(value.clone()).is_err() {
                to_remove.push(*id);
            }
        }

        for id in to_remove {
            trace!("Pruning closed subscription {}", id);
            registry.subscribers.remove(&id);
        }
    }
}

/// Receiving end of a `Broadcaster`
pub struct Subscription<T> {
    id: SubscriptionId,
    rx: tokio_mpsc::UnboundedReceiver<T>,
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T> Subscription<T> {
    /// Wait for the next notification. Returns `None` once the broadcaster
    /// is gone and everything queued has been drained.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Take the next queued notification without waiting
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Drain everything currently queued
    pub fn drain(&mut self) -> Vec<T> {
        let mut values = Vec::new();
        while let Some(value) = self.try_recv() {
            values.push(value);
        }
        values
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).subscribers.remove(&self.id);
        }
    }
}
