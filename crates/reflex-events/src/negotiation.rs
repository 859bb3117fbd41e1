// ABOUTME: Size negotiation between a pane and its neighbors.
// ABOUTME: Emits one awaited `element.size` event per direction, strictly in order.

use std::sync::Arc;
use std::time::Duration;

use reflex_core::{Direction, DirectionSpec, PaneId};
use tokio::sync::Mutex;

use crate::bus::{BusEvent, EmitError, EventBus, ListenerError, SubscriptionId};

/// Payload of an `element.size` event. Lives only for one emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub size: u32,
    pub direction: Direction,
    pub element: PaneId,
}

impl BusEvent for ResizeRequest {
    const NAME: &'static str = "element.size";
}

pub type SizeBus = EventBus<ResizeRequest>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationOutcome {
    /// The requested size matched the previous one; nothing was emitted
    Unchanged,
    /// Every direction was emitted and all of its listeners resolved
    Completed { size: u32, directions: Vec<Direction> },
}

#[derive(Debug, thiserror::Error)]
pub enum NegotiationError {
    #[error("Size listener for {direction} failed: {source}")]
    Listener {
        direction: Direction,
        subscription: SubscriptionId,
        #[source]
        source: ListenerError,
    },

    #[error("Size listener for {direction} did not finish within {timeout:?}")]
    ListenerTimeout {
        direction: Direction,
        subscription: SubscriptionId,
        timeout: Duration,
    },
}

impl NegotiationError {
    fn from_emit(direction: Direction, err: EmitError) -> Self {
        match err {
            EmitError::Listener {
                subscription,
                source,
            } => NegotiationError::Listener {
                direction,
                subscription,
                source,
            },
            EmitError::Timeout {
                subscription,
                timeout,
            } => NegotiationError::ListenerTimeout {
                direction,
                subscription,
                timeout,
            },
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            NegotiationError::Listener { direction, .. }
            | NegotiationError::ListenerTimeout { direction, .. } => *direction,
        }
    }
}

/// Per-pane negotiation handle. Clones share state, so cycles started from
/// any clone run one at a time in the order they were requested.
#[derive(Clone)]
pub struct SizeNegotiator {
    element: PaneId,
    bus: SizeBus,
    listener_timeout: Option<Duration>,
    previous_size: Arc<Mutex<Option<u32>>>,
}

impl SizeNegotiator {
    pub fn new(element: PaneId, bus: SizeBus) -> Self {
        Self {
            element,
            bus,
            listener_timeout: None,
            previous_size: Arc::new(Mutex::new(None)),
        }
    }

    /// Bound how long each listener may take. Without it a listener that
    /// never resolves stalls the cycle forever.
    pub fn with_listener_timeout(mut self, timeout: Duration) -> Self {
        self.listener_timeout = Some(timeout);
        self
    }

    /// Size the pane was mounted with; it does not trigger a negotiation.
    pub fn with_initial_size(self, size: Option<u32>) -> Self {
        Self {
            previous_size: Arc::new(Mutex::new(size)),
            ..self
        }
    }

    pub async fn previous_size(&self) -> Option<u32> {
        *self.previous_size.lock().await
    }

    /// Run one negotiation cycle for a new target `size`.
    ///
    /// A listener must not call back into `negotiate` on the same pane: it
    /// would wait on the cycle it is part of until the listener timeout.
    pub async fn negotiate(
        &self,
        size: u32,
        direction: &DirectionSpec,
    ) -> Result<NegotiationOutcome, NegotiationError> {
        let mut previous = self.previous_size.lock().await;
        if *previous == Some(size) {
            return Ok(NegotiationOutcome::Unchanged);
        }
        // Recorded before emitting: a failed cycle is not re-run for the same size
        *previous = Some(size);

        let directions = direction.to_list();
        tracing::info!(
            "Negotiating size {} for {} across {:?}",
            size,
            self.element,
            directions
        );

        for direction in &directions {
            let request = ResizeRequest {
                size,
                direction: *direction,
                element: self.element,
            };
            if let Err(err) = self.bus.emit(request, self.listener_timeout).await {
                let err = NegotiationError::from_emit(*direction, err);
                tracing::warn!("Negotiation for {} aborted: {}", self.element, err);
                return Err(err);
            }
        }

        Ok(NegotiationOutcome::Completed { size, directions })
    }
}
