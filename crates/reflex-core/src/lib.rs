// ABOUTME: Shared types and configuration for reflex-pane.
// ABOUTME: Defines pane geometry, pane props, and config file handling.

pub mod config;
pub mod geometry;
pub mod props;

pub use config::{Config, ConfigError, HostSettings, NegotiationSettings};
pub use geometry::{
    Bounds, Dimensions, Direction, DirectionSpec, Extent, Measurement, PaneId, RotateMode,
    RotateModeError,
};
pub use props::PaneProps;
