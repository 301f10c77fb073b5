//! bussin demo entry point.
//!
//! Walks through the three buses the way a small windowed application
//! would use them, logging what each emit reaches.

use std::cell::Cell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;

use bussin::{
    EventBus, Handler, RegistryConfig, ScopeId, ScopedRegistry, SharedScopedRegistry, Vocabulary,
};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RegistryConfig::from_env()?;
    tracing::info!(?config, "starting bussin demo");

    run_frame_bus();
    run_window(config)?;
    run_lifecycle(config)?;

    Ok(())
}

/// Open-vocabulary bus driving a simulation loop.
fn run_frame_bus() {
    let bus: EventBus<String, u64> = EventBus::new();
    let frames = Rc::new(Cell::new(0_u64));

    let sink = Rc::clone(&frames);
    let physics = Handler::new(move |frame: &u64| sink.set(*frame));
    let render = Handler::new(|frame: &u64| tracing::debug!(frame, "render"));

    bus.subscribe("frame", &physics);
    bus.subscribe("frame", &render);
    for frame in 1..=3 {
        let reached = bus.emit("frame", &frame);
        tracing::info!(frame, reached, "frame emitted");
    }

    bus.unsubscribe("frame", &render);
    let reached = bus.emit("frame", &4);
    tracing::info!(reached, last_frame = frames.get(), "render detached");
}

/// Per-window registry: each widget subscribes under its own scope and
/// detaches everything at once when it is destroyed.
fn run_window(config: RegistryConfig) -> anyhow::Result<()> {
    let vocabulary = Vocabulary::new(["open", "close", "resize"])?;
    let window: ScopedRegistry<String, (u32, u32)> =
        ScopedRegistry::with_config(vocabulary, config);

    let toolbar = ScopeId::new();
    let canvas = ScopeId::new();

    let layout = Handler::new(|size: &(u32, u32)| tracing::debug!(?size, "toolbar layout"));
    let repaint = Handler::new(|size: &(u32, u32)| tracing::debug!(?size, "canvas repaint"));

    window.subscribe_in("resize", &layout, toolbar);
    window.subscribe_in("close", &layout, toolbar);
    window.subscribe_in("resize", &repaint, canvas);
    if !window.subscribe("minimise", &repaint) {
        tracing::info!("\"minimise\" is not a window event; subscription ignored");
    }

    let reached = window.emit("resize", &(800, 600));
    tracing::info!(reached, "window resized");

    let removed = window.revoke_scope(&toolbar);
    let reached = window.emit("resize", &(1024, 768));
    tracing::info!(%toolbar, removed, reached, "toolbar destroyed");

    Ok(())
}

/// Class-wide registry: every object of a kind reports through a handle
/// of the same declaration.
fn run_lifecycle(config: RegistryConfig) -> anyhow::Result<()> {
    let vocabulary = Vocabulary::new(["created", "dropped"])?;
    let objects: SharedScopedRegistry<String, String> =
        SharedScopedRegistry::with_config(vocabulary, config);

    let live = Rc::new(Cell::new(0_i64));
    let up = Rc::clone(&live);
    let down = Rc::clone(&live);
    let on_created = Handler::new(move |_: &String| up.set(up.get() + 1));
    let on_dropped = Handler::new(move |_: &String| down.set(down.get() - 1));

    let monitor = ScopeId::new();
    objects.subscribe_in("created", &on_created, monitor);
    objects.subscribe_in("dropped", &on_dropped, monitor);

    let first = objects.handle();
    let second = objects.handle();
    first.emit("created", &"player".to_string());
    second.emit("created", &"enemy".to_string());
    second.emit("dropped", &"enemy".to_string());
    tracing::info!(live = live.get(), handles = objects.handle_count(), "objects tracked");

    objects.revoke_scope(&monitor);
    let reached = first.emit("created", &"ghost".to_string());
    tracing::info!(reached, live = live.get(), "monitor detached");

    Ok(())
}
