//! Publishing the output directory to a static host.
//!
//! # Responsibility
//! - Define the `Publisher` seam used to push generated artifacts.
//! - Provide a command-backed implementation driven by config.
//!
//! # Invariants
//! - `publish_output` never returns an error; failures are logged and
//!   reported in the returned `PublishReport`.

use crate::config::PublishSettings;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

const MAX_STDERR_CHARS: usize = 240;

/// Publish failures.
#[derive(Debug)]
pub enum PublishError {
    /// No publish command is configured.
    NotConfigured,
    /// The output directory does not exist yet.
    MissingOutputDir(PathBuf),
    /// The publish program could not be started.
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// The publish program exited unsuccessfully.
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl Display for PublishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "no publish command configured"),
            Self::MissingOutputDir(path) => {
                write!(f, "output directory `{}` does not exist", path.display())
            }
            Self::Spawn { program, source } => write!(f, "failed to start `{program}`: {source}"),
            Self::Failed {
                program,
                code,
                stderr,
            } => {
                match code {
                    Some(code) => write!(f, "`{program}` exited with status {code}")?,
                    None => write!(f, "`{program}` was terminated by a signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Pushes a directory of generated artifacts somewhere public.
pub trait Publisher {
    /// Short identifier used in logs.
    fn name(&self) -> &str;
    fn publish(&self, output_dir: &Path) -> Result<(), PublishError>;
}

/// Runs an external program with the output directory as its last argument.
#[derive(Debug, Clone)]
pub struct CommandPublisher {
    argv: Vec<String>,
}

impl CommandPublisher {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn from_settings(settings: &PublishSettings) -> Self {
        Self::new(settings.command.clone())
    }
}

impl Publisher for CommandPublisher {
    fn name(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("command")
    }

    fn publish(&self, output_dir: &Path) -> Result<(), PublishError> {
        let (program, args) = self.argv.split_first().ok_or(PublishError::NotConfigured)?;
        if program.trim().is_empty() {
            return Err(PublishError::NotConfigured);
        }
        if !output_dir.is_dir() {
            return Err(PublishError::MissingOutputDir(output_dir.to_path_buf()));
        }

        let output = Command::new(program)
            .args(args)
            .arg(output_dir)
            .output()
            .map_err(|source| PublishError::Spawn {
                program: program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }
        Err(PublishError::Failed {
            program: program.clone(),
            code: output.status.code(),
            stderr: summarize(&String::from_utf8_lossy(&output.stderr)),
        })
    }
}

/// Outcome of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub publisher: String,
    pub succeeded: bool,
    /// Human-readable failure reason when `succeeded` is false.
    pub message: Option<String>,
}

/// Publishes `output_dir`, logging instead of propagating failures.
pub fn publish_output(publisher: &dyn Publisher, output_dir: &Path) -> PublishReport {
    let started_at = Instant::now();
    info!(
        "event=publish module=service status=start publisher={}",
        publisher.name()
    );

    match publisher.publish(output_dir) {
        Ok(()) => {
            info!(
                "event=publish module=service status=ok publisher={} duration_ms={}",
                publisher.name(),
                started_at.elapsed().as_millis()
            );
            PublishReport {
                publisher: publisher.name().to_string(),
                succeeded: true,
                message: None,
            }
        }
        Err(err) => {
            error!(
                "event=publish module=service status=error publisher={} duration_ms={} error={}",
                publisher.name(),
                started_at.elapsed().as_millis(),
                err
            );
            PublishReport {
                publisher: publisher.name().to_string(),
                succeeded: false,
                message: Some(err.to_string()),
            }
        }
    }
}

fn summarize(stderr: &str) -> String {
    let normalized = stderr.trim().replace(['\n', '\r'], " ");
    let mut summary: String = normalized.chars().take(MAX_STDERR_CHARS).collect();
    if normalized.chars().count() > MAX_STDERR_CHARS {
        summary.push_str("...");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::{publish_output, CommandPublisher, PublishError, Publisher};
    use std::path::Path;

    struct FailingPublisher;

    impl Publisher for FailingPublisher {
        fn name(&self) -> &str {
            "failing"
        }

        fn publish(&self, _output_dir: &Path) -> Result<(), PublishError> {
            Err(PublishError::NotConfigured)
        }
    }

    #[test]
    fn failures_are_reported_not_propagated() {
        let report = publish_output(&FailingPublisher, Path::new("/nonexistent"));
        assert!(!report.succeeded);
        assert_eq!(report.publisher, "failing");
        assert_eq!(report.message.as_deref(), Some("no publish command configured"));
    }

    #[test]
    fn empty_command_is_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandPublisher::new(Vec::new())
            .publish(dir.path())
            .unwrap_err();
        assert!(matches!(err, PublishError::NotConfigured));
    }

    #[test]
    fn missing_output_dir_is_rejected_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("public");
        let err = CommandPublisher::new(vec!["true".to_string()])
            .publish(&missing)
            .unwrap_err();
        assert!(matches!(err, PublishError::MissingOutputDir(path) if path == missing));
    }

    #[test]
    fn unknown_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandPublisher::new(vec!["triage-rota-no-such-program".to_string()])
            .publish(dir.path())
            .unwrap_err();
        assert!(matches!(err, PublishError::Spawn { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn command_receives_output_dir_and_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("triage.ics"), "x").unwrap();

        let ok = CommandPublisher::new(vec!["test".to_string(), "-d".to_string()]);
        assert!(ok.publish(dir.path()).is_ok());

        let failing = CommandPublisher::new(vec!["test".to_string(), "-f".to_string()]);
        let err = failing.publish(dir.path()).unwrap_err();
        assert!(
            matches!(err, PublishError::Failed { code: Some(1), .. }),
            "{err}"
        );
    }
}
