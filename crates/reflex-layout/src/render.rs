// ABOUTME: Rotation-aware rendering of a pane's outer slot and inner content box.
// ABOUTME: Optionally injects the content-box dimensions into each child.

use reflex_core::{Dimensions, Extent, PaneProps};
use serde::Serialize;

/// A child that can be handed its parent's content-box dimensions.
pub trait ReceivesDimensions: Clone {
    /// Return a copy with `dimensions` set and every other field unchanged.
    fn with_dimensions(self, dimensions: Dimensions) -> Self;
}

impl ReceivesDimensions for PaneProps {
    fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

/// The pane's slot in its parent. Never rotated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OuterStyle {
    pub flex: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InnerStyle {
    pub height: Extent,
    pub width: Extent,
    pub rotation_degrees: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPane<C> {
    pub class_name: String,
    pub outer: OuterStyle,
    pub inner: InnerStyle,
    pub children: Vec<C>,
}

impl<C> RenderedPane<C> {
    /// Dimensions of the inner content box, after rotation
    pub fn content_dimensions(&self) -> Dimensions {
        Dimensions {
            height: self.inner.height,
            width: self.inner.width,
        }
    }
}

/// Lay out one pane from its props and committed dimensions. Pure: the same
/// inputs always produce the same output.
pub fn render<C: ReceivesDimensions>(
    props: &PaneProps,
    dimensions: Dimensions,
    children: &[C],
) -> RenderedPane<C> {
    let content = dimensions.rotated(props.rotate_mode);

    let children = if props.propagate_dimensions {
        children
            .iter()
            .cloned()
            .map(|child| child.with_dimensions(content))
            .collect()
    } else {
        children.to_vec()
    };

    RenderedPane {
        class_name: props.merged_class_name(),
        outer: OuterStyle { flex: props.flex },
        inner: InnerStyle {
            height: content.height,
            width: content.width,
            rotation_degrees: props.rotate_mode.degrees(),
        },
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflex_core::{Direction, DirectionSpec, RotateMode};

    fn props(rotate_mode: RotateMode, propagate_dimensions: bool) -> PaneProps {
        PaneProps {
            flex: 0.4,
            rotate_mode,
            propagate_dimensions,
            class_name: "viewer".to_string(),
            ..PaneProps::default()
        }
    }

    fn child(name: &str) -> PaneProps {
        PaneProps {
            class_name: name.to_string(),
            direction: DirectionSpec::One(Direction::Top),
            flex: 2.0,
            ..PaneProps::default()
        }
    }

    #[test]
    fn even_modes_pass_dimensions_through() {
        for mode in [RotateMode::Deg0, RotateMode::Deg180] {
            let out = render::<PaneProps>(&props(mode, false), Dimensions::px(200, 100), &[]);
            assert_eq!(out.content_dimensions(), Dimensions::px(200, 100));
        }
    }

    #[test]
    fn odd_modes_swap_inner_box_but_not_outer_slot() {
        for mode in [RotateMode::Deg90, RotateMode::Deg270] {
            let out = render::<PaneProps>(&props(mode, false), Dimensions::px(200, 100), &[]);
            assert_eq!(out.inner.width, Extent::Px(200));
            assert_eq!(out.inner.height, Extent::Px(100));
            assert_eq!(out.inner.rotation_degrees, mode.degrees());
            assert_eq!(out.outer, OuterStyle { flex: 0.4 });
        }
    }

    #[test]
    fn rendering_is_idempotent() {
        let children = vec![child("a"), child("b")];
        for mode in [
            RotateMode::Deg0,
            RotateMode::Deg90,
            RotateMode::Deg180,
            RotateMode::Deg270,
        ] {
            let p = props(mode, true);
            let first = render(&p, Dimensions::px(300, 120), &children);
            let second = render(&p, Dimensions::px(300, 120), &children);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn propagation_injects_only_dimensions() {
        let children = vec![child("a"), child("b")];
        let out = render(
            &props(RotateMode::Deg0, true),
            Dimensions::px(200, 100),
            &children,
        );

        assert_eq!(out.children.len(), 2);
        for (original, rendered) in children.iter().zip(&out.children) {
            assert_eq!(rendered.dimensions, Some(Dimensions::px(200, 100)));
            let restored = PaneProps {
                dimensions: None,
                ..rendered.clone()
            };
            assert_eq!(&restored, original);
        }
    }

    #[test]
    fn propagated_dimensions_follow_rotation() {
        let out = render(
            &props(RotateMode::Deg90, true),
            Dimensions::px(200, 100),
            &[child("a")],
        );
        assert_eq!(out.children[0].dimensions, Some(Dimensions::px(100, 200)));
    }

    #[test]
    fn children_untouched_without_propagation() {
        let children = vec![child("a")];
        let out = render(
            &props(RotateMode::Deg90, false),
            Dimensions::px(200, 100),
            &children,
        );
        assert_eq!(out.children, children);
    }

    #[test]
    fn unmeasured_pane_fills_its_slot() {
        let out = render::<PaneProps>(&props(RotateMode::Deg90, false), Dimensions::FILL, &[]);
        assert_eq!(out.content_dimensions(), Dimensions::FILL);
        assert_eq!(out.class_name, "reflex-element viewer");
    }

    #[test]
    fn rendered_pane_serializes() {
        let out = render::<PaneProps>(&props(RotateMode::Deg0, false), Dimensions::px(10, 20), &[]);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["inner"]["height"], 10);
        assert_eq!(json["class_name"], "reflex-element viewer");
    }
}
