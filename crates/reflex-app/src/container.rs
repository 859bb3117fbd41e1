// ABOUTME: Row container that owns the main-axis sizes of sibling panes.
// ABOUTME: Listens for `element.size` and trades pixels with the named neighbor.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::anyhow;
use reflex_core::{Direction, PaneId};
use reflex_events::{ListenerError, ResizeRequest, SizeBus, SubscriptionId};

/// Smallest main-axis size a pane may be squeezed to
pub const MIN_PANE_SIZE: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    id: PaneId,
    size: u32,
}

#[derive(Clone)]
pub struct Container {
    slots: Arc<Mutex<Vec<Slot>>>,
}

impl Container {
    /// Split `total` pixels between panes in proportion to their flex weights
    pub fn new(total: u32, panes: impl IntoIterator<Item = (PaneId, f32)>) -> Self {
        let panes: Vec<(PaneId, f32)> = panes.into_iter().collect();
        let weight: f32 = panes.iter().map(|(_, flex)| flex.max(0.0)).sum();

        let mut slots: Vec<Slot> = panes
            .iter()
            .map(|(id, flex)| {
                let share = if weight > 0.0 {
                    flex.max(0.0) / weight
                } else {
                    1.0 / panes.len() as f32
                };
                Slot {
                    id: *id,
                    size: (total as f32 * share).floor() as u32,
                }
            })
            .collect();

        // Rounding leftovers go to the last pane
        let used: u32 = slots.iter().map(|s| s.size).sum();
        if let Some(last) = slots.last_mut() {
            last.size += total.saturating_sub(used);
        }

        Self {
            slots: Arc::new(Mutex::new(slots)),
        }
    }

    pub fn attach(&self, bus: &SizeBus) -> SubscriptionId {
        let slots = Arc::clone(&self.slots);
        bus.subscribe(move |request: ResizeRequest| {
            let slots = Arc::clone(&slots);
            async move {
                // Let other tasks run first, as a real layout pass would
                tokio::task::yield_now().await;
                let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                apply_request(&mut slots, request)
            }
        })
    }

    pub fn sizes(&self) -> Vec<(PaneId, u32)> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|slot| (slot.id, slot.size))
            .collect()
    }

    pub fn size_of(&self, id: PaneId) -> Option<u32> {
        self.sizes()
            .into_iter()
            .find_map(|(pane, size)| (pane == id).then_some(size))
    }
}

fn apply_request(slots: &mut [Slot], request: ResizeRequest) -> Result<(), ListenerError> {
    let index = slots
        .iter()
        .position(|slot| slot.id == request.element)
        .ok_or_else(|| anyhow!("{} is not in this container", request.element))?;

    let current = slots[index].size;
    if request.size == current {
        return Ok(());
    }

    let neighbor = match request.direction {
        Direction::Left | Direction::Top => index.checked_sub(1),
        Direction::Right | Direction::Bottom => Some(index + 1).filter(|&i| i < slots.len()),
    }
    .ok_or_else(|| anyhow!("{} has no neighbor to the {}", request.element, request.direction))?;

    let available = slots[neighbor].size + current;
    if request.size.saturating_add(MIN_PANE_SIZE) > available {
        return Err(anyhow!(
            "{} cannot take {}px: {} would shrink below {}px",
            request.element,
            request.size,
            slots[neighbor].id,
            MIN_PANE_SIZE
        )
        .into());
    }

    slots[neighbor].size = available - request.size;
    slots[index].size = request.size;
    tracing::info!(
        "{} is now {}px, {} gave way to {}px",
        request.element,
        request.size,
        slots[neighbor].id,
        slots[neighbor].size
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflex_core::DirectionSpec;
    use reflex_events::{NegotiationError, SizeNegotiator};

    fn three_panes() -> Container {
        Container::new(
            900,
            [(PaneId(0), 1.0), (PaneId(1), 1.0), (PaneId(2), 1.0)],
        )
    }

    #[test]
    fn splits_by_flex_weight() {
        let container = Container::new(1000, [(PaneId(0), 1.0), (PaneId(1), 3.0)]);
        assert_eq!(container.sizes(), vec![(PaneId(0), 250), (PaneId(1), 750)]);
    }

    #[test]
    fn rounding_leftovers_go_to_last_pane() {
        let container = Container::new(100, [(PaneId(0), 1.0), (PaneId(1), 1.0), (PaneId(2), 1.0)]);
        let total: u32 = container.sizes().iter().map(|(_, s)| s).sum();
        assert_eq!(total, 100);
        assert_eq!(container.size_of(PaneId(2)), Some(34));
    }

    #[tokio::test]
    async fn first_direction_settles_before_second() {
        let container = three_panes();
        let bus = SizeBus::new();
        container.attach(&bus);

        let negotiator = SizeNegotiator::new(PaneId(1), bus);
        negotiator
            .negotiate(400, &DirectionSpec::from(vec![Direction::Left, Direction::Right]))
            .await
            .unwrap();

        // Left neighbor absorbed the change; right saw nothing left to do
        assert_eq!(
            container.sizes(),
            vec![(PaneId(0), 200), (PaneId(1), 400), (PaneId(2), 300)]
        );
    }

    #[tokio::test]
    async fn neighbor_at_minimum_vetoes() {
        let container = three_panes();
        let bus = SizeBus::new();
        container.attach(&bus);

        let negotiator = SizeNegotiator::new(PaneId(0), bus);
        let err = negotiator
            .negotiate(590, &DirectionSpec::One(Direction::Right))
            .await
            .unwrap_err();

        assert!(matches!(err, NegotiationError::Listener { .. }));
        assert_eq!(container.size_of(PaneId(0)), Some(300));
        assert_eq!(container.size_of(PaneId(1)), Some(300));
    }

    #[tokio::test]
    async fn edge_pane_has_no_outer_neighbor() {
        let container = three_panes();
        let bus = SizeBus::new();
        container.attach(&bus);

        let negotiator = SizeNegotiator::new(PaneId(0), bus);
        let err = negotiator
            .negotiate(250, &DirectionSpec::One(Direction::Left))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no neighbor to the left"));
    }
}
