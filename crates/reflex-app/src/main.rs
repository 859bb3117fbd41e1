// ABOUTME: Demo host entry point.
// ABOUTME: Mounts sibling panes, simulates layout measurements, and negotiates resizes.

mod container;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reflex_core::{Config, Direction, DirectionSpec, Measurement, PaneId, PaneProps, RotateMode};
use reflex_events::SizeBus;
use reflex_layout::{MeasurementSource, Pane, PaneContext};

use container::Container;

const CONTAINER_WIDTH: u32 = 1200;
const CONTAINER_HEIGHT: f64 = 800.0;
/// Measurements reported per pane during a simulated window drag
const BURST_LEN: usize = 6;

/// Layout used when the config file doesn't list any panes
fn demo_panes() -> Vec<PaneProps> {
    vec![
        PaneProps {
            flex: 1.0,
            direction: DirectionSpec::One(Direction::Right),
            class_name: "sidebar".to_string(),
            ..PaneProps::default()
        },
        PaneProps {
            flex: 2.0,
            direction: DirectionSpec::Many(vec![Direction::Left, Direction::Right]),
            rotate_mode: RotateMode::Deg90,
            propagate_dimensions: true,
            class_name: "viewer".to_string(),
            ..PaneProps::default()
        },
        PaneProps {
            flex: 1.0,
            direction: DirectionSpec::One(Direction::Left),
            class_name: "inspector".to_string(),
            ..PaneProps::default()
        },
    ]
}

fn load_config() -> Result<Config> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            Config::load(&path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => Ok(Config::load_or_default()),
    }
}

/// Report a burst of slightly jittering boxes for every pane, matching the
/// container's current sizes, then let the throttle windows run out.
async fn layout_pass(source: &MeasurementSource, panes: &mut [Pane], container: &Container) {
    for step in 0..BURST_LEN {
        let jitter = step as f64 * 0.37;
        for pane in panes.iter_mut() {
            let width = container.size_of(pane.id()).unwrap_or_default() as f64;
            source.report(pane.id(), Measurement::new(CONTAINER_HEIGHT - jitter, width + jitter));
            pane.pump(Instant::now());
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Sources may hiccup; a box-less report must change nothing
    if let Some(first) = panes.first() {
        source.report(first.id(), Measurement::empty());
    }

    let longest = panes
        .iter()
        .map(|p| Duration::from_millis(p.props().render_on_resize_rate))
        .max()
        .unwrap_or_default();
    tokio::time::sleep(longest).await;

    for pane in panes.iter_mut() {
        pane.pump(Instant::now());
        tracing::info!(
            "{} measured {}x{} after {} commits",
            pane.id(),
            pane.dimensions().width,
            pane.dimensions().height,
            pane.revision()
        );
    }
}

fn render_all(panes: &mut [Pane]) -> Result<()> {
    let child = PaneProps {
        class_name: "nested".to_string(),
        ..PaneProps::default()
    };
    for pane in panes.iter_mut() {
        if !pane.take_render() {
            continue;
        }
        let rendered = pane.render(std::slice::from_ref(&child));
        tracing::info!("Rendered {}: {}", pane.id(), serde_json::to_string(&rendered)?);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting reflex demo");

    let config = load_config()?;
    let props = if config.panes.is_empty() {
        demo_panes()
    } else {
        config.panes.clone()
    };

    let context = PaneContext {
        host: config.host.clone(),
        negotiation: config.negotiation.clone(),
        bus: SizeBus::new(),
    };
    let source = MeasurementSource::new();

    let mut panes: Vec<Pane> = props
        .into_iter()
        .enumerate()
        .map(|(i, props)| Pane::new(PaneId(i as u64), props, &context))
        .collect();
    for pane in panes.iter_mut() {
        pane.on_mount(&source);
    }

    let container = Container::new(
        CONTAINER_WIDTH,
        panes.iter().map(|p| (p.id(), p.props().flex)),
    );
    container.attach(&context.bus);
    tracing::info!("Initial sizes: {:?}", container.sizes());

    layout_pass(&source, &mut panes, &container).await;
    render_all(&mut panes)?;

    let middle = panes.len() / 2;
    if let Some(pane) = panes.get(middle) {
        let current = container.size_of(pane.id()).unwrap_or_default();

        // Grow the middle pane by a quarter, then ask for more than the row can give
        for target in [current + current / 4, CONTAINER_WIDTH] {
            match pane.set_size(target).await {
                Ok(outcome) => tracing::info!("Negotiation for {}: {:?}", pane.id(), outcome),
                Err(err) => tracing::error!("Negotiation for {} failed: {}", pane.id(), err),
            }
        }
    }

    tracing::info!("Sizes after negotiation: {:?}", container.sizes());
    layout_pass(&source, &mut panes, &container).await;
    render_all(&mut panes)?;

    for pane in panes.iter_mut() {
        pane.on_unmount();
    }
    tracing::info!("All panes unmounted, exiting");
    Ok(())
}
