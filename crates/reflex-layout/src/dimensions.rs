// ABOUTME: Committed pane dimensions and their validated partial updates.
// ABOUTME: Tracks revisions so hosts know when a re-render is due.

use reflex_core::{Bounds, Dimensions, Extent};

/// Partial update; `None` leaves that axis untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DimensionUpdate {
    pub height: Option<f64>,
    pub width: Option<f64>,
}

impl DimensionUpdate {
    pub fn from_bounds(bounds: Bounds) -> Self {
        Self {
            height: Some(bounds.height),
            width: Some(bounds.width),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.height.is_none() && self.width.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum DimensionError {
    #[error("{axis} must be finite, got {value}")]
    NotFinite { axis: &'static str, value: f64 },

    #[error("{axis} must not be negative, got {value}")]
    Negative { axis: &'static str, value: f64 },

    #[error("{axis} of {value} does not fit in a pixel count")]
    TooLarge { axis: &'static str, value: f64 },
}

fn to_extent(axis: &'static str, value: f64) -> Result<Extent, DimensionError> {
    if !value.is_finite() {
        return Err(DimensionError::NotFinite { axis, value });
    }
    if value < 0.0 {
        return Err(DimensionError::Negative { axis, value });
    }
    let floored = value.floor();
    if floored > u32::MAX as f64 {
        return Err(DimensionError::TooLarge { axis, value });
    }
    Ok(Extent::Px(floored as u32))
}

#[derive(Debug, Clone, Default)]
pub struct DimensionState {
    current: Dimensions,
    revision: u64,
    render_pending: bool,
}

impl DimensionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Dimensions {
        self.current
    }

    /// Number of committed updates so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Both axes hold measured pixel values
    pub fn is_measured(&self) -> bool {
        !self.current.height.is_fill() && !self.current.width.is_fill()
    }

    /// Merge `update` into the current dimensions, flooring to whole pixels.
    /// Both axes are validated before anything is written, so a rejected
    /// update leaves state untouched. An empty update commits nothing.
    pub fn apply(&mut self, update: DimensionUpdate) -> Result<Dimensions, DimensionError> {
        if update.is_empty() {
            return Ok(self.current);
        }

        let height = update.height.map(|h| to_extent("height", h)).transpose()?;
        let width = update.width.map(|w| to_extent("width", w)).transpose()?;

        if let Some(height) = height {
            self.current.height = height;
        }
        if let Some(width) = width {
            self.current.width = width;
        }
        self.revision += 1;
        self.render_pending = true;
        Ok(self.current)
    }

    /// Returns true once per batch of commits since the last call
    pub fn take_render(&mut self) -> bool {
        std::mem::take(&mut self.render_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_filling_available_space() {
        let state = DimensionState::new();
        assert_eq!(state.current(), Dimensions::FILL);
        assert!(!state.is_measured());
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn partial_update_keeps_other_axis() {
        let mut state = DimensionState::new();
        state
            .apply(DimensionUpdate::from_bounds(Bounds::new(200.9, 100.2)))
            .unwrap();
        assert_eq!(state.current(), Dimensions::px(200, 100));
        assert!(state.is_measured());

        let dims = state
            .apply(DimensionUpdate {
                height: None,
                width: Some(333.7),
            })
            .unwrap();
        assert_eq!(dims, Dimensions::px(200, 333));
        assert_eq!(state.revision(), 2);
    }

    #[test]
    fn rejected_update_leaves_state_untouched() {
        let mut state = DimensionState::new();
        state
            .apply(DimensionUpdate::from_bounds(Bounds::new(50.0, 60.0)))
            .unwrap();
        state.take_render();

        let bad = [
            DimensionUpdate {
                height: Some(10.0),
                width: Some(-1.0),
            },
            DimensionUpdate {
                height: Some(f64::NAN),
                width: None,
            },
            DimensionUpdate {
                height: None,
                width: Some(f64::INFINITY),
            },
            DimensionUpdate {
                height: Some(1e12),
                width: None,
            },
        ];
        for update in bad {
            assert!(state.apply(update).is_err());
        }

        assert_eq!(state.current(), Dimensions::px(50, 60));
        assert_eq!(state.revision(), 1);
        assert!(!state.take_render());
    }

    #[test]
    fn negative_error_names_axis() {
        let mut state = DimensionState::new();
        let err = state
            .apply(DimensionUpdate {
                height: Some(-3.0),
                width: None,
            })
            .unwrap_err();
        assert_eq!(
            err,
            DimensionError::Negative {
                axis: "height",
                value: -3.0
            }
        );
    }

    #[test]
    fn render_flag_is_taken_once() {
        let mut state = DimensionState::new();
        assert!(!state.take_render());

        state
            .apply(DimensionUpdate::from_bounds(Bounds::new(1.0, 1.0)))
            .unwrap();
        state
            .apply(DimensionUpdate::from_bounds(Bounds::new(2.0, 2.0)))
            .unwrap();
        assert!(state.take_render());
        assert!(!state.take_render());
    }

    #[test]
    fn empty_update_commits_nothing() {
        let mut state = DimensionState::new();
        state.apply(DimensionUpdate::default()).unwrap();
        assert_eq!(state.revision(), 0);
        assert!(!state.take_render());
    }
}
