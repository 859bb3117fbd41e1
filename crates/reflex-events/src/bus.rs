// ABOUTME: Typed publish/subscribe bus with awaited, fallible listeners.
// ABOUTME: Emission runs every subscriber to completion before returning.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

type ListenerFuture = Pin<Box<dyn Future<Output = Result<(), ListenerError>> + Send>>;
type Listener<E> = Arc<dyn Fn(E) -> ListenerFuture + Send + Sync>;

/// An event that can travel over an [`EventBus`].
pub trait BusEvent: Clone + Send + 'static {
    /// Channel name, used in logs
    const NAME: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Listener {subscription:?} failed: {source}")]
    Listener {
        subscription: SubscriptionId,
        #[source]
        source: ListenerError,
    },

    #[error("Listener {subscription:?} did not finish within {timeout:?}")]
    Timeout {
        subscription: SubscriptionId,
        timeout: Duration,
    },
}

struct Registry<E> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
}

/// Shared channel. Clones refer to the same subscriber list.
pub struct EventBus<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry<E>> {
        // A panicking listener never runs while the lock is held, so the data is intact
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe<F, Fut>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        let listener: Listener<E> =
            Arc::new(move |event: E| -> ListenerFuture { Box::pin(listener(event)) });
        let mut registry = self.registry();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, listener));
        tracing::debug!("Subscribed {:?} to {}", id, E::NAME);
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry();
        let before = registry.listeners.len();
        registry.listeners.retain(|(sub, _)| *sub != id);
        before != registry.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.registry().listeners.len()
    }

    /// Deliver `event` to every current subscriber, one after another, in
    /// subscription order. Stops at the first listener that fails or runs
    /// past `timeout`. Returns how many listeners ran.
    ///
    /// The subscriber list is captured up front: listeners added or removed
    /// while this emission is in flight take effect on the next one.
    pub async fn emit(&self, event: E, timeout: Option<Duration>) -> Result<usize, EmitError> {
        let listeners: Vec<(SubscriptionId, Listener<E>)> = self.registry().listeners.clone();

        for (id, listener) in &listeners {
            let fut = listener(event.clone());
            let result = match timeout {
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(result) => result,
                    Err(_) => {
                        return Err(EmitError::Timeout {
                            subscription: *id,
                            timeout: limit,
                        })
                    }
                },
                None => fut.await,
            };
            result.map_err(|source| EmitError::Listener {
                subscription: *id,
                source,
            })?;
        }

        Ok(listeners.len())
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}
