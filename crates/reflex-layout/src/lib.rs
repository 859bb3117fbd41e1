// ABOUTME: Resizable pane management for flex layouts.
// ABOUTME: Turns raw measurements into throttled dimensions and renders rotated content boxes.

mod dimensions;
mod measure;
mod pane;
mod render;
mod throttle;

pub use dimensions::{DimensionError, DimensionState, DimensionUpdate};
pub use measure::{MeasurementSource, Observation};
pub use pane::{Pane, PaneContext};
pub use render::{render, InnerStyle, OuterStyle, ReceivesDimensions, RenderedPane};
pub use throttle::Throttle;
