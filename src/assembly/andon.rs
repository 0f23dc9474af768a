//! Andon alerts for corpus assembly.
//!
//! Cells that reject most of their draws, exhaust their retry budget, or
//! finish under target raise an [`AndonEvent`]. Handlers decide what to do
//! with it: the default logs through `tracing`, the test handler collects
//! events for inspection. A handler that asks to halt makes the assembler
//! abandon the remaining cells.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::task::{Category, Difficulty};

/// How urgently an assembly alert needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AndonSeverity {
    /// Recorded for the run log only.
    Info,
    /// Cell output is degraded but usable.
    Warning,
    /// Cell output is unusable without intervention.
    Critical,
}

impl std::fmt::Display for AndonSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Something noteworthy that happened while filling a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum AndonEvent {
    /// Share of rejected draws in a cell exceeded the threshold.
    HighRejectionRate {
        category: Category,
        difficulty: Difficulty,
        /// Rejected draws over all draws (0.0-1.0).
        rate: f32,
        /// Configured threshold.
        threshold: f32,
    },
    /// A task slot exhausted its generator attempts.
    GenerationFailure {
        category: Category,
        difficulty: Difficulty,
        index: usize,
        message: String,
    },
    /// Cell finished with fewer accepted tasks than requested.
    CellUnderTarget {
        category: Category,
        difficulty: Difficulty,
        accepted: usize,
        target: usize,
    },
}

impl AndonEvent {
    /// Critical events are the ones worth halting a run for.
    #[must_use]
    pub fn severity(&self) -> AndonSeverity {
        match self {
            Self::HighRejectionRate { rate, threshold, .. } => {
                if *rate > threshold + 0.05 {
                    AndonSeverity::Critical
                } else {
                    AndonSeverity::Warning
                }
            }
            Self::GenerationFailure { .. } => AndonSeverity::Info,
            Self::CellUnderTarget { accepted, .. } => {
                if *accepted == 0 {
                    AndonSeverity::Critical
                } else {
                    AndonSeverity::Warning
                }
            }
        }
    }

    /// Cell the event concerns.
    #[must_use]
    pub fn cell(&self) -> (Category, Difficulty) {
        match self {
            Self::HighRejectionRate {
                category,
                difficulty,
                ..
            }
            | Self::GenerationFailure {
                category,
                difficulty,
                ..
            }
            | Self::CellUnderTarget {
                category,
                difficulty,
                ..
            } => (*category, *difficulty),
        }
    }
}

impl std::fmt::Display for AndonEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HighRejectionRate {
                category,
                difficulty,
                rate,
                threshold,
            } => write!(
                f,
                "ANDON: {category}/{difficulty} rejection rate {:.1}% > {:.1}%",
                rate * 100.0,
                threshold * 100.0
            ),
            Self::GenerationFailure {
                category,
                difficulty,
                index,
                message,
            } => write!(
                f,
                "ANDON: {category}/{difficulty} slot {index} failed - {message}"
            ),
            Self::CellUnderTarget {
                category,
                difficulty,
                accepted,
                target,
            } => write!(
                f,
                "ANDON: {category}/{difficulty} under target {accepted}/{target}"
            ),
        }
    }
}

/// Receives assembly alerts as cells finish.
///
/// # Example
///
/// ```
/// use spatial_eval::assembly::andon::{AndonEvent, AndonHandler, AndonSeverity};
///
/// struct StrictAndon;
///
/// impl AndonHandler for StrictAndon {
///     fn on_event(&self, event: &AndonEvent) {
///         eprintln!("[{}] {}", event.severity(), event);
///     }
///
///     fn should_halt(&self, event: &AndonEvent) -> bool {
///         event.severity() == AndonSeverity::Critical
///     }
/// }
/// ```
pub trait AndonHandler: Send + Sync {
    /// Observe one alert.
    fn on_event(&self, event: &AndonEvent);

    /// Whether the assembler should abandon the remaining cells.
    fn should_halt(&self, event: &AndonEvent) -> bool;
}

/// Logs events through `tracing` and never halts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAndon;

impl DefaultAndon {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AndonHandler for DefaultAndon {
    fn on_event(&self, event: &AndonEvent) {
        let (category, difficulty) = event.cell();
        match event.severity() {
            AndonSeverity::Info => info!(%category, %difficulty, "{event}"),
            AndonSeverity::Warning | AndonSeverity::Critical => {
                warn!(%category, %difficulty, severity = %event.severity(), "{event}");
            }
        }
    }

    fn should_halt(&self, _event: &AndonEvent) -> bool {
        false
    }
}

/// Records alerts in memory instead of logging them.
#[derive(Debug, Default)]
pub struct TestAndon {
    events: Mutex<Vec<AndonEvent>>,
    halt_on_critical: bool,
    halted: AtomicBool,
}

impl TestAndon {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the assembler to halt on the first critical event.
    #[must_use]
    pub fn halting_on_critical() -> Self {
        Self {
            halt_on_critical: true,
            ..Self::default()
        }
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<AndonEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn was_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Forget recorded alerts and the halt flag.
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
        self.halted.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn count_high_rejection(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, AndonEvent::HighRejectionRate { .. }))
            .count()
    }

    #[must_use]
    pub fn count_under_target(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, AndonEvent::CellUnderTarget { .. }))
            .count()
    }
}

impl AndonHandler for TestAndon {
    fn on_event(&self, event: &AndonEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        if self.should_halt(event) {
            self.halted.store(true, Ordering::SeqCst);
        }
    }

    fn should_halt(&self, event: &AndonEvent) -> bool {
        self.halt_on_critical && event.severity() == AndonSeverity::Critical
    }
}

/// Alert thresholds for an assembly run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndonConfig {
    /// Raise rejection-rate alerts at all.
    pub enabled: bool,
    /// Share of rejected draws above which a cell is flagged.
    pub rejection_threshold: f32,
}

impl Default for AndonConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rejection_threshold: 0.5,
        }
    }
}

impl AndonConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_rejection_threshold(mut self, threshold: f32) -> Self {
        self.rejection_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn exceeds_rejection_threshold(&self, rate: f32) -> bool {
        self.enabled && rate > self.rejection_threshold
    }
}
