// ABOUTME: A single resizable pane and its lifecycle.
// ABOUTME: Wires measurement, throttling, dimension state, negotiation, and rendering together.

use std::time::{Duration, Instant};

use reflex_core::{
    Bounds, Dimensions, HostSettings, Measurement, NegotiationSettings, PaneId, PaneProps,
};
use reflex_events::{NegotiationError, NegotiationOutcome, SizeBus, SizeNegotiator};

use crate::dimensions::{DimensionState, DimensionUpdate};
use crate::measure::{MeasurementSource, Observation};
use crate::render::{render, ReceivesDimensions, RenderedPane};
use crate::throttle::Throttle;

/// Environment shared by sibling panes
#[derive(Clone, Default)]
pub struct PaneContext {
    pub host: HostSettings,
    pub negotiation: NegotiationSettings,
    pub bus: SizeBus,
}

pub struct Pane {
    id: PaneId,
    props: PaneProps,
    host: HostSettings,
    state: DimensionState,
    throttle: Throttle<Bounds>,
    negotiator: SizeNegotiator,
    observation: Option<Observation>,
}

fn throttle_window(props: &PaneProps) -> Duration {
    Duration::from_millis(props.render_on_resize_rate)
}

impl Pane {
    pub fn new(id: PaneId, props: PaneProps, context: &PaneContext) -> Self {
        let mut negotiator =
            SizeNegotiator::new(id, context.bus.clone()).with_initial_size(props.size);
        if let Some(timeout) = context.negotiation.listener_timeout() {
            negotiator = negotiator.with_listener_timeout(timeout);
        }

        Self {
            id,
            throttle: Throttle::new(throttle_window(&props)),
            props,
            host: context.host.clone(),
            state: DimensionState::new(),
            negotiator,
            observation: None,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn props(&self) -> &PaneProps {
        &self.props
    }

    pub fn dimensions(&self) -> Dimensions {
        self.state.current()
    }

    /// Number of committed dimension updates
    pub fn revision(&self) -> u64 {
        self.state.revision()
    }

    /// Handle for running negotiations without borrowing the pane
    pub fn negotiator(&self) -> SizeNegotiator {
        self.negotiator.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.observation.is_some()
    }

    fn renders_on_resize(&self) -> bool {
        self.props.render_on_resize_or(self.host.render_on_resize)
    }

    pub fn on_mount(&mut self, source: &MeasurementSource) {
        self.observation = Some(source.observe(self.id));
        tracing::debug!("Mounted {}", self.id);
    }

    /// Release the measurement subscription and drop any parked measurement
    pub fn on_unmount(&mut self) {
        self.observation = None;
        self.throttle.cancel();
        tracing::debug!("Unmounted {}", self.id);
    }

    /// Feed one measurement through the throttle. Returns true if it
    /// committed new dimensions right away.
    pub fn on_bounds_changed(&mut self, measurement: Measurement, now: Instant) -> bool {
        if !self.renders_on_resize() {
            return false;
        }
        let Some(bounds) = measurement.bounds else {
            tracing::debug!("Ignoring measurement without bounds for {}", self.id);
            return false;
        };
        match self.throttle.call(now, bounds) {
            Some(bounds) => self.commit(bounds),
            None => false,
        }
    }

    /// Commit a parked measurement whose throttle window has ended
    pub fn flush(&mut self, now: Instant) -> bool {
        if !self.renders_on_resize() {
            self.throttle.cancel();
            return false;
        }
        match self.throttle.poll(now) {
            Some(bounds) => self.commit(bounds),
            None => false,
        }
    }

    /// When [`Pane::flush`] next has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttle.deadline()
    }

    /// Drain queued measurements and flush. For hosts that drive panes from
    /// their own loop instead of [`Pane::run_measurements`].
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut committed = 0;
        while let Some(measurement) = self.observation.as_mut().and_then(Observation::try_next) {
            committed += usize::from(self.on_bounds_changed(measurement, now));
        }
        committed + usize::from(self.flush(now))
    }

    /// Process measurements until the source stops reporting or the pane is
    /// unmounted. Parked measurements are flushed on their deadline.
    ///
    /// Holds the pane for as long as it runs, so give it a dedicated task
    /// and take the pane back when the task finishes. Hosts that need to
    /// render or update props in between should call [`Pane::pump`] instead.
    pub async fn run_measurements(&mut self) {
        loop {
            let deadline = self.throttle.deadline();
            let Some(observation) = self.observation.as_mut() else {
                return;
            };

            tokio::select! {
                measurement = observation.next() => match measurement {
                    Some(measurement) => {
                        self.on_bounds_changed(measurement, tokio::time::Instant::now().into_std());
                    }
                    None => {
                        let now = tokio::time::Instant::now().into_std();
                        if let Some(deadline) = self.throttle.deadline() {
                            tokio::time::sleep_until(deadline.into()).await;
                            self.flush(deadline.max(now));
                        }
                        return;
                    }
                },
                _ = sleep_until_deadline(deadline) => {
                    self.flush(tokio::time::Instant::now().into_std());
                }
            }
        }
    }

    fn commit(&mut self, bounds: Bounds) -> bool {
        let mut update = DimensionUpdate::from_bounds(bounds);
        if self.props.enforce_axis_gating {
            if !self.props.resize_height {
                update.height = None;
            }
            if !self.props.resize_width {
                update.width = None;
            }
            if update.is_empty() {
                return false;
            }
        }

        match self.state.apply(update) {
            Ok(dimensions) => {
                tracing::debug!(
                    "{} resized to {}x{}",
                    self.id,
                    dimensions.width,
                    dimensions.height
                );
                true
            }
            Err(err) => {
                tracing::debug!("Rejected dimensions for {}: {}", self.id, err);
                false
            }
        }
    }

    /// True once after any commit; the host should re-render the pane (and
    /// its children, when dimensions propagate).
    pub fn take_render(&mut self) -> bool {
        self.state.take_render()
    }

    pub fn render<C: ReceivesDimensions>(&self, children: &[C]) -> RenderedPane<C> {
        render(&self.props, self.state.current(), children)
    }

    /// Replace the pane's props. Returns the new target size when it differs
    /// from the old one; pass it to [`Pane::set_size`] to negotiate.
    pub fn update_props(&mut self, props: PaneProps) -> Option<u32> {
        let changed_size = (props.size != self.props.size).then_some(props.size).flatten();
        if props.render_on_resize_rate != self.props.render_on_resize_rate {
            self.throttle.set_window(throttle_window(&props));
        }
        self.props = props;
        if !self.renders_on_resize() {
            self.throttle.cancel();
        }
        changed_size
    }

    /// Negotiate a new target size with neighbors in every configured direction.
    pub async fn set_size(&self, size: u32) -> Result<NegotiationOutcome, NegotiationError> {
        self.negotiator
            .negotiate(size, &self.props.direction)
            .await
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}
