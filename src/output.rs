// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::events::{DeployEvent, EventSink, TracingSink};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

impl OutputMode {
    pub fn from_flags(quiet: bool, json: bool) -> Self {
        if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

/// Handles CLI output based on the configured mode.
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

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => print_json(&JsonMessage {
                event: "success",
                message,
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print a non-fatal problem. Shown in every mode.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => print_json(&JsonMessage {
                event: "warning",
                message,
                duration_secs: None,
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonMessage {
                    event: "error",
                    message,
                    duration_secs: self.duration(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print a structured record: a JSON line, or `text` for humans.
    pub fn record<T: Serialize>(&self, value: &T, text: &str) {
        match self.mode {
            OutputMode::Json => print_json(value),
            OutputMode::Normal | OutputMode::Quiet => println!("{text}"),
        }
    }

    /// Event sink matching this output's mode.
    pub fn sink(&self) -> OutputSink {
        OutputSink { mode: self.mode }
    }
}

fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonMessage<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

/// Shows deploy events on the terminal and forwards them to `tracing`.
#[derive(Debug, Clone, Copy)]
pub struct OutputSink {
    mode: OutputMode,
}

impl OutputSink {
    /// One-line summary of the events a person watching a deploy cares about.
    fn describe(event: &DeployEvent) -> Option<String> {
        match event {
            DeployEvent::BuildingImage {
                image, endpoint, ..
            } => Some(format!("  → Building {image} on {endpoint}")),
            DeployEvent::ContainerStarted {
                container, image, ..
            } => Some(format!("  → Started {} from {image}", container.short())),
            DeployEvent::RestartingContainer {
                project, container, ..
            } => Some(format!("  → Restarting {project} ({})", container.short())),
            _ => None,
        }
    }
}

impl EventSink for OutputSink {
    fn emit(&self, event: DeployEvent) {
        match self.mode {
            OutputMode::Json => print_json(&event),
            OutputMode::Normal => {
                if let Some(line) = Self::describe(&event) {
                    println!("{line}");
                }
            }
            OutputMode::Quiet => {}
        }
        TracingSink.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContainerId, ProjectName};

    #[test]
    fn json_wins_over_quiet() {
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Json);
        assert_eq!(OutputMode::from_flags(true, false), OutputMode::Quiet);
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Normal);
    }

    #[test]
    fn progress_events_are_described() {
        let started = DeployEvent::ContainerStarted {
            project: ProjectName::new("web").unwrap(),
            container: ContainerId::new("0123456789abcdef"),
            image: "web:abc".to_string(),
            endpoint: "unix:///var/run/docker.sock".to_string(),
        };
        assert_eq!(
            OutputSink::describe(&started).as_deref(),
            Some("  → Started 0123456789ab from web:abc")
        );

        let tagging = DeployEvent::TaggingImage {
            project: ProjectName::new("web").unwrap(),
            image: "web:abc".to_string(),
            tag: "latest".to_string(),
        };
        assert_eq!(OutputSink::describe(&tagging), None);
    }

    #[test]
    fn timer_is_zero_until_started() {
        let mut output = Output::new(OutputMode::Quiet);
        assert_eq!(output.duration(), None);
        output.start_timer();
        assert!(output.duration().is_some());
    }
}
