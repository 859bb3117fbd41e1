// ABOUTME: Per-pane configuration as supplied by the pane's container.
// ABOUTME: Holds flex weight, directions, rotation, and resize behavior flags.

use serde::{Deserialize, Serialize};

use crate::geometry::{Dimensions, DirectionSpec, RotateMode};

/// Style tag every pane carries in addition to its own class names.
pub const BASE_CLASS: &str = "reflex-element";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneProps {
    /// Main-axis weight, passed through to the outer box untouched
    pub flex: f32,

    /// Side(s) negotiated with neighbors when `size` changes
    pub direction: DirectionSpec,

    /// Target main-axis size in pixels requested by the container
    pub size: Option<u32>,

    pub rotate_mode: RotateMode,

    /// Accept measured height changes (only consulted with `enforce_axis_gating`)
    pub resize_height: bool,

    /// Accept measured width changes (only consulted with `enforce_axis_gating`)
    pub resize_width: bool,

    /// Honor `resize_height`/`resize_width`. Off by default: measured
    /// updates apply to both axes.
    pub enforce_axis_gating: bool,

    /// Apply measurement updates at all. `None` falls back to the host default.
    pub render_on_resize: Option<bool>,

    /// Inject committed dimensions into children
    pub propagate_dimensions: bool,

    /// Throttle window for measurement updates, in milliseconds
    pub render_on_resize_rate: u64,

    /// Space-separated style tags
    pub class_name: String,

    /// Dimensions injected by a parent pane with `propagate_dimensions` set
    pub dimensions: Option<Dimensions>,
}

impl Default for PaneProps {
    fn default() -> Self {
        Self {
            flex: 1.0,
            direction: DirectionSpec::default(),
            size: None,
            rotate_mode: RotateMode::Deg0,
            resize_height: true,
            resize_width: true,
            enforce_axis_gating: false,
            render_on_resize: None,
            propagate_dimensions: false,
            render_on_resize_rate: 60,
            class_name: String::new(),
            dimensions: None,
        }
    }
}

impl PaneProps {
    /// `render_on_resize`, resolved against the host's default.
    pub fn render_on_resize_or(&self, host_default: bool) -> bool {
        self.render_on_resize.unwrap_or(host_default)
    }

    /// The base class followed by this pane's own tags, without blanks or repeats.
    pub fn merged_class_name(&self) -> String {
        let mut tags: Vec<&str> = vec![BASE_CLASS];
        for tag in self.class_name.split_whitespace() {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags.join(" ")
    }
}
