// ABOUTME: Geometry types shared by panes, the throttle, and the renderer.
// ABOUTME: Covers pixel extents, measured bounds, directions, and rotation modes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaneId(pub u64);

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane-{}", self.0)
    }
}

/// One axis of a pane's size: a concrete pixel count, or the initial
/// "fill available space" sentinel (100%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawExtent", into = "RawExtent")]
pub enum Extent {
    #[default]
    Fill,
    Px(u32),
}

impl Extent {
    pub fn is_fill(&self) -> bool {
        matches!(self, Extent::Fill)
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Fill => write!(f, "100%"),
            Extent::Px(px) => write!(f, "{}px", px),
        }
    }
}

/// Wire form of [`Extent`]: a bare integer for pixels, `"100%"` for fill.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawExtent {
    Px(u32),
    Text(String),
}

impl TryFrom<RawExtent> for Extent {
    type Error = String;

    fn try_from(raw: RawExtent) -> Result<Self, Self::Error> {
        match raw {
            RawExtent::Px(px) => Ok(Extent::Px(px)),
            RawExtent::Text(text) if text.trim() == "100%" => Ok(Extent::Fill),
            RawExtent::Text(text) => Err(format!("invalid extent {:?}, expected pixels or \"100%\"", text)),
        }
    }
}

impl From<Extent> for RawExtent {
    fn from(extent: Extent) -> Self {
        match extent {
            Extent::Fill => RawExtent::Text("100%".to_string()),
            Extent::Px(px) => RawExtent::Px(px),
        }
    }
}

/// Committed pane size as an ordered {height, width} pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub height: Extent,
    pub width: Extent,
}

impl Dimensions {
    /// Both axes fill the available space. This is what a pane starts with.
    pub const FILL: Self = Self {
        height: Extent::Fill,
        width: Extent::Fill,
    };

    pub const fn px(height: u32, width: u32) -> Self {
        Self {
            height: Extent::Px(height),
            width: Extent::Px(width),
        }
    }

    pub fn swapped(&self) -> Self {
        Self {
            height: self.width,
            width: self.height,
        }
    }

    /// The content-box shape for a rotation: odd quarter turns swap the axes.
    pub fn rotated(&self, mode: RotateMode) -> Self {
        if mode.swaps_axes() {
            self.swapped()
        } else {
            *self
        }
    }
}

/// Raw bounding box reported by layout, in fractional pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub height: f64,
    pub width: f64,
}

impl Bounds {
    pub fn new(height: f64, width: f64) -> Self {
        Self { height, width }
    }
}

/// A single report from a measurement source. `bounds` is `None` when the
/// source had nothing usable to report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurement {
    pub bounds: Option<Bounds>,
}

impl Measurement {
    pub fn new(height: f64, width: f64) -> Self {
        Self {
            bounds: Some(Bounds::new(height, width)),
        }
    }

    pub fn empty() -> Self {
        Self { bounds: None }
    }
}

/// Side of a pane that a resize pushes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Top => "top",
            Direction::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A pane's `direction` prop: a single side or an ordered list of sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectionSpec {
    One(Direction),
    Many(Vec<Direction>),
}

impl DirectionSpec {
    /// Directions in negotiation order.
    pub fn to_list(&self) -> Vec<Direction> {
        match self {
            DirectionSpec::One(direction) => vec![*direction],
            DirectionSpec::Many(directions) => directions.clone(),
        }
    }
}

impl Default for DirectionSpec {
    fn default() -> Self {
        DirectionSpec::Many(Vec::new())
    }
}

impl From<Direction> for DirectionSpec {
    fn from(direction: Direction) -> Self {
        DirectionSpec::One(direction)
    }
}

impl From<Vec<Direction>> for DirectionSpec {
    fn from(directions: Vec<Direction>) -> Self {
        DirectionSpec::Many(directions)
    }
}

/// Logical rotation of a pane's content box in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RotateMode {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RotateModeError {
    #[error("Rotate mode must be between 0 and 3, got {0}")]
    OutOfRange(u8),
}

impl RotateMode {
    pub fn degrees(&self) -> u16 {
        match self {
            RotateMode::Deg0 => 0,
            RotateMode::Deg90 => 90,
            RotateMode::Deg180 => 180,
            RotateMode::Deg270 => 270,
        }
    }

    pub fn swaps_axes(&self) -> bool {
        matches!(self, RotateMode::Deg90 | RotateMode::Deg270)
    }
}

impl TryFrom<u8> for RotateMode {
    type Error = RotateModeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RotateMode::Deg0),
            1 => Ok(RotateMode::Deg90),
            2 => Ok(RotateMode::Deg180),
            3 => Ok(RotateMode::Deg270),
            other => Err(RotateModeError::OutOfRange(other)),
        }
    }
}

impl From<RotateMode> for u8 {
    fn from(mode: RotateMode) -> Self {
        match mode {
            RotateMode::Deg0 => 0,
            RotateMode::Deg90 => 1,
            RotateMode::Deg180 => 2,
            RotateMode::Deg270 => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_swaps_only_for_odd_modes() {
        let dims = Dimensions::px(200, 100);
        assert_eq!(dims.rotated(RotateMode::Deg0), dims);
        assert_eq!(dims.rotated(RotateMode::Deg180), dims);
        assert_eq!(dims.rotated(RotateMode::Deg90), Dimensions::px(100, 200));
        assert_eq!(dims.rotated(RotateMode::Deg270), Dimensions::px(100, 200));
    }

    #[test]
    fn rotate_mode_rejects_out_of_range() {
        assert_eq!(RotateMode::try_from(3u8), Ok(RotateMode::Deg270));
        assert_eq!(RotateMode::try_from(4u8), Err(RotateModeError::OutOfRange(4)));
    }

    #[test]
    fn scalar_direction_becomes_single_element_list() {
        let spec = DirectionSpec::from(Direction::Left);
        assert_eq!(spec.to_list(), vec![Direction::Left]);

        let spec = DirectionSpec::from(vec![Direction::Left, Direction::Right]);
        assert_eq!(spec.to_list(), vec![Direction::Left, Direction::Right]);
    }

    #[test]
    fn extent_display() {
        assert_eq!(Extent::Fill.to_string(), "100%");
        assert_eq!(Extent::Px(42).to_string(), "42px");
    }
}
