//! Drives both indicators against the wall clock and logs what a renderer
//! would stroke each frame.
//!
//! Run with `RUST_LOG=example=debug` to see every arc.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use halo_components::{
    ActivityIndicatorArgs, ActivityIndicatorView, AnimationStyle, ProgressView, ProgressViewArgs,
};
use halo_ui::{ArcCommand, Color, MediaClock, Rect, SystemClock, Widget};
use tracing::{debug, info};

const FRAME: Duration = Duration::from_millis(16);
const FRAMES_PER_STEP: usize = 30;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing() -> Result<(), BoxError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("off,example=info,halo_components=info"))?;
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init()
}

fn log_frame(name: &str, commands: &[ArcCommand]) {
    for command in commands {
        debug!(
            widget = name,
            start = command.start_angle_degrees,
            sweep = command.sweep_angle_degrees,
            radius = command.radius,
            color = ?command.color.to_array(),
            "arc"
        );
    }
}

fn log_paths(name: &str, widget: &impl Widget) {
    for (id, layer) in widget.view().sublayers() {
        if let Some(path) = layer.path.as_ref() {
            let events = path.to_path().iter().count();
            info!(widget = name, layer = ?id, events, "layer path");
        }
    }
}

fn main() -> Result<(), BoxError> {
    init_tracing()?;

    let clock: Arc<dyn MediaClock> = Arc::new(SystemClock::new());

    let mut spinner = ActivityIndicatorView::new(
        ActivityIndicatorArgs::default()
            .animation_style(AnimationStyle::Extendable)
            .hides_when_stopped(true),
        clock.clone(),
    );
    if let Some(size) = spinner.intrinsic_size() {
        spinner.set_bounds(Rect::from_size(size));
    }

    let finished = Arc::new(AtomicUsize::new(0));
    let mut progress = ProgressView::new(
        ProgressViewArgs::default()
            .progress_color(Color::from_rgb(0.2, 0.5, 0.9))
            .animation_did_finish({
                let finished = finished.clone();
                move || {
                    finished.fetch_add(1, Ordering::Relaxed);
                }
            }),
        clock,
    );
    progress.set_bounds(Rect::new(0.0, 0.0, 120.0, 120.0));

    spinner.frame();
    progress.frame();
    log_paths("activity", &spinner);
    log_paths("progress", &progress);

    for (step, target) in [10.0, 35.0, 60.0, 60.0, 100.0].into_iter().enumerate() {
        progress.set_progress(target);
        // Pause the spinner halfway through to show it resuming in place.
        spinner.set_should_animate(step != 2);
        info!(step, target, animating = spinner.is_animating(), "step");

        for _ in 0..FRAMES_PER_STEP {
            log_frame("activity", &spinner.frame());
            log_frame("progress", &progress.frame());
            thread::sleep(FRAME);
        }
    }

    spinner.set_should_animate(false);
    info!(
        fills_finished = finished.load(Ordering::Relaxed),
        spinner_hidden = spinner.view().is_hidden(),
        "done"
    );
    Ok(())
}
