//! Progress reporting for the pipeline stages
//!
//! Provides a simple API for displaying run state:
//! - Current phase (Loading, Projecting, Generating, ...)
//! - Progress (current/total with optional details)
//! - Activity log, routed through `tracing`

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Pipeline phases shown while a stage runs
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    Projecting,
    Generating,
    PlacingArtifacts,
    Writing,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Loading => write!(f, "Loading input"),
            Phase::Projecting => write!(f, "Projecting star catalog"),
            Phase::Generating => write!(f, "Generating system objects"),
            Phase::PlacingArtifacts => write!(f, "Placing artifacts"),
            Phase::Writing => write!(f, "Writing output"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - allows both console and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
}

/// Console UI: a progress bar on stderr plus log lines
pub struct ConsoleUi {
    bar: Option<ProgressBar>,
    style: ProgressStyle,
    phase: Phase,
}

impl ConsoleUi {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("{prefix:28} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");

        Self {
            bar: None,
            style,
            phase: Phase::Loading,
        }
    }

    fn bar(&mut self, total: u64) -> &ProgressBar {
        let style = self.style.clone();
        let prefix = self.phase.to_string();
        let bar = self.bar.get_or_insert_with(|| {
            let pb = ProgressBar::new(total);
            pb.set_style(style);
            pb.set_prefix(prefix);
            pb
        });
        if bar.length() != Some(total) {
            bar.set_length(total);
        }
        bar
    }
}

impl Default for ConsoleUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        self.clear_progress();
        info!(phase = %phase, "phase");
        self.phase = phase;
    }

    fn set_info(&mut self, info: impl Into<String>) {
        let info = info.into();
        info!("{}", info);
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        let label = label.into();
        let bar = self.bar(total);
        bar.set_position(current);
        bar.set_message(label);
    }

    fn clear_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        match &self.bar {
            Some(bar) => bar.suspend(|| info!("{}", message)),
            None => info!("{}", message),
        }
    }
}

impl Drop for ConsoleUi {
    fn drop(&mut self) {
        self.clear_progress();
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}
