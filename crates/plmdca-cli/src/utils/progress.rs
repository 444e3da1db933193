use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use plmdca::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SPINNER_TICK_MS: u64 = 80;

struct PhaseState {
    bar: ProgressBar,
    total_phases: usize,
    completed_phases: usize,
    current: Option<(&'static str, Instant)>,
}

impl PhaseState {
    fn label(&self, name: &str) -> String {
        format!(
            "[{}/{}] {}",
            self.completed_phases + 1,
            self.total_phases.max(self.completed_phases + 1),
            name
        )
    }
}

/// Renders scoring phases as `[n/N] <phase>` lines, with a per-pair bar while
/// the Frobenius norms are computed.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseState>>,
}

impl CliProgressHandler {
    pub fn new(total_phases: usize) -> Self {
        Self::with_draw_target(total_phases, ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state without drawing anything.
    pub fn hidden(total_phases: usize) -> Self {
        Self::with_draw_target(total_phases, ProgressDrawTarget::hidden())
    }

    fn with_draw_target(total_phases: usize, target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(Self::spinner_style());
        Self {
            state: Arc::new(Mutex::new(PhaseState {
                bar,
                total_phases,
                completed_phases: 0,
                current: None,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    let label = state.label(name);
                    state.current = Some((name, Instant::now()));
                    state.bar.reset();
                    state.bar.set_length(0);
                    state.bar.set_style(Self::spinner_style());
                    state.bar.set_prefix(label);
                    state.bar.set_message("");
                    state
                        .bar
                        .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::PhaseFinish => {
                    let summary = match state.current.take() {
                        Some((name, started)) => {
                            let elapsed = started.elapsed().as_secs_f64();
                            debug!(phase = name, elapsed, "Phase finished.");
                            format!("✓ {} ({:.1}s)", name, elapsed)
                        }
                        None => "✓ Done".to_string(),
                    };
                    state.completed_phases += 1;
                    state.bar.disable_steady_tick();
                    state.bar.set_style(Self::spinner_style());
                    state.bar.set_prefix("");
                    state.bar.finish_with_message(summary.clone());
                    state.bar.println(summary);
                }
                Progress::TaskStart { total_steps } => {
                    state.bar.disable_steady_tick();
                    state.bar.reset();
                    state.bar.set_length(total_steps);
                    state.bar.set_position(0);
                    state.bar.set_style(Self::pair_bar_style());
                }
                Progress::TaskIncrement { amount } => {
                    state.bar.inc(amount);
                }
                Progress::TaskFinish => {
                    let length = state.bar.length().unwrap_or(0);
                    if state.bar.position() < length {
                        state.bar.set_position(length);
                    }
                }
                Progress::Message(msg) => {
                    state.bar.println(format!("  {}", msg));
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn pair_bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:<32} [{bar:40.cyan/blue}] {pos}/{len} pairs ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}
