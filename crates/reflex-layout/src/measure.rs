// ABOUTME: Measurement source that delivers rendered bounds to mounted panes.
// ABOUTME: Each observation deregisters itself from the source when dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use reflex_core::{Measurement, PaneId};
use tokio::sync::mpsc;

struct Observer {
    generation: u64,
    sender: mpsc::UnboundedSender<Measurement>,
}

#[derive(Default)]
struct Observers {
    next_generation: u64,
    by_pane: HashMap<PaneId, Observer>,
}

/// Stand-in for the layout engine's resize observer. Clones share observers.
#[derive(Clone, Default)]
pub struct MeasurementSource {
    observers: Arc<Mutex<Observers>>,
}

impl MeasurementSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn observers(&self) -> MutexGuard<'_, Observers> {
        self.observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start observing `pane`. A second observation for the same pane
    /// replaces the first, whose stream then ends.
    pub fn observe(&self, pane: PaneId) -> Observation {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut observers = self.observers();
        let generation = observers.next_generation;
        observers.next_generation += 1;
        observers.by_pane.insert(pane, Observer { generation, sender });
        tracing::debug!("Observing {} (generation {})", pane, generation);

        Observation {
            pane,
            generation,
            receiver,
            source: Arc::downgrade(&self.observers),
        }
    }

    /// Deliver a measurement to `pane`. Returns false if nobody is observing it.
    pub fn report(&self, pane: PaneId, measurement: Measurement) -> bool {
        let mut observers = self.observers();
        let Some(observer) = observers.by_pane.get(&pane) else {
            return false;
        };
        if observer.sender.send(measurement).is_err() {
            observers.by_pane.remove(&pane);
            return false;
        }
        true
    }

    pub fn is_observing(&self, pane: PaneId) -> bool {
        self.observers().by_pane.contains_key(&pane)
    }

    pub fn observed_count(&self) -> usize {
        self.observers().by_pane.len()
    }
}

/// A pane's registration with a [`MeasurementSource`].
pub struct Observation {
    pane: PaneId,
    generation: u64,
    receiver: mpsc::UnboundedReceiver<Measurement>,
    source: Weak<Mutex<Observers>>,
}

impl Observation {
    /// Next queued measurement without waiting
    pub fn try_next(&mut self) -> Option<Measurement> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next measurement. `None` once the source stops reporting.
    pub async fn next(&mut self) -> Option<Measurement> {
        self.receiver.recv().await
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        let Some(source) = self.source.upgrade() else {
            return;
        };
        let mut observers = source
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Only remove our own registration, not a newer one for the same pane
        let ours = observers
            .by_pane
            .get(&self.pane)
            .is_some_and(|o| o.generation == self.generation);
        if ours {
            observers.by_pane.remove(&self.pane);
            tracing::debug!("Stopped observing {}", self.pane);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_reach_the_observer() {
        let source = MeasurementSource::new();
        let mut observation = source.observe(PaneId(1));

        assert!(source.report(PaneId(1), Measurement::new(10.0, 20.0)));
        assert!(!source.report(PaneId(2), Measurement::new(10.0, 20.0)));

        assert_eq!(observation.try_next(), Some(Measurement::new(10.0, 20.0)));
        assert_eq!(observation.try_next(), None);
    }

    #[test]
    fn dropping_observation_deregisters() {
        let source = MeasurementSource::new();
        let observation = source.observe(PaneId(1));
        assert!(source.is_observing(PaneId(1)));

        drop(observation);
        assert!(!source.is_observing(PaneId(1)));
        assert!(!source.report(PaneId(1), Measurement::empty()));
    }

    #[test]
    fn stale_observation_does_not_remove_newer_one() {
        let source = MeasurementSource::new();
        let old = source.observe(PaneId(1));
        let mut new = source.observe(PaneId(1));

        drop(old);
        assert!(source.is_observing(PaneId(1)));
        assert!(source.report(PaneId(1), Measurement::new(1.0, 1.0)));
        assert!(new.try_next().is_some());
    }

    #[tokio::test]
    async fn stream_ends_when_source_is_gone() {
        let source = MeasurementSource::new();
        let mut observation = source.observe(PaneId(3));
        source.report(PaneId(3), Measurement::new(5.0, 5.0));
        drop(source);

        assert_eq!(observation.next().await, Some(Measurement::new(5.0, 5.0)));
        assert_eq!(observation.next().await, None);
    }
}
