// ABOUTME: User-facing progress and result output for the CLI.
// ABOUTME: Human, quiet (CI) and JSON-lines modes; errors name the failed stage.

use serde::Serialize;
use std::time::Instant;

use crate::diagnostics::Warning;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Progress messages and a timed summary.
    #[default]
    Normal,
    /// Final result and problems only.
    Quiet,
    /// One JSON object per line.
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Stage progress (suppressed in quiet mode).
    pub fn progress(&self, stage: &str, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("[{stage}] {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit(
                false,
                &JsonEvent {
                    event: "progress",
                    stage: Some(stage),
                    message,
                    duration_secs: None,
                },
            ),
        }
    }

    /// A non-fatal problem. Shown in every mode.
    pub fn warning(&self, warning: &Warning) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Warning: {}", warning.message);
            }
            OutputMode::Json => emit(
                true,
                &JsonEvent {
                    event: "warning",
                    stage: Some(warning.kind.as_str()),
                    message: &warning.message,
                    duration_secs: None,
                },
            ),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => match self.duration() {
                Some(elapsed) if elapsed > 0.0 => println!("{message} ({:.1}s)", elapsed),
                _ => println!("{message}"),
            },
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => emit(
                false,
                &JsonEvent {
                    event: "success",
                    stage: None,
                    message,
                    duration_secs: self.duration(),
                },
            ),
        }
    }

    /// One-line diagnostic naming the failed stage.
    pub fn error(&self, stage: &str, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {stage} failed: {message}");
            }
            OutputMode::Json => emit(
                true,
                &JsonEvent {
                    event: "error",
                    stage: Some(stage),
                    message,
                    duration_secs: self.duration(),
                },
            ),
        }
    }
}

fn emit(to_stderr: bool, event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        if to_stderr {
            eprintln!("{json}");
        } else {
            println!("{json}");
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<&'a str>,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
