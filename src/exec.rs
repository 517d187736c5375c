// Dry-run-aware command execution engine

//! Shared command execution.
//!
//! Every component talks to the outside world through an [`Executor`]
//! wrapping a [`CommandBackend`]. Read-only probes ([`Executor::capture`])
//! always execute, even in dry-run mode, so both modes observe the same
//! system state and take the same branches. Mutating commands
//! ([`Executor::run`]) are printed and synthesized as success in dry-run
//! mode, and otherwise either tolerate failure ([`Tolerance::BestEffort`],
//! logged) or propagate it ([`Tolerance::Mandatory`]).

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::HotspotError;

/// Validates that an interface or connection name is safe to embed in
/// commands. Only alphanumeric characters, hyphens, and underscores are
/// allowed.
pub fn validate_interface_name(name: &str) -> Result<(), HotspotError> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(HotspotError::InvalidInterfaceName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Quote a value for embedding in a shell-interpreted command line.
/// Values made only of unambiguous characters pass through unchanged;
/// anything else is single-quoted with embedded quotes escaped.
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | ','));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

#[derive(Debug, Clone)]
enum InvocationKind {
    Argv(Vec<String>),
    Shell(String),
}

/// A fully-formed external command: an argument vector, or a single
/// shell-interpreted string when shell features (redirection, `||`) are
/// needed.
#[derive(Debug, Clone)]
pub struct Invocation {
    kind: InvocationKind,
    display: Option<String>,
}

impl Invocation {
    /// Command from an argument vector; the first element is the program.
    pub fn argv<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: InvocationKind::Argv(parts.into_iter().map(Into::into).collect()),
            display: None,
        }
    }

    /// Command interpreted by `sh -c`.
    pub fn shell(command: impl Into<String>) -> Self {
        Self {
            kind: InvocationKind::Shell(command.into()),
            display: None,
        }
    }

    /// Replace the printed form. Used to mask secrets in dry-run output
    /// and failure reports.
    pub fn redacted(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// The true command line, as handed to the backend.
    pub fn command_line(&self) -> String {
        match &self.kind {
            InvocationKind::Argv(argv) => argv.join(" "),
            InvocationKind::Shell(command) => command.clone(),
        }
    }

    /// The printable command line, with any redaction applied.
    pub fn display_line(&self) -> String {
        self.display.clone().unwrap_or_else(|| self.command_line())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_line())
    }
}

/// Captured output of a completed command.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    /// Exit code, when the process exited normally.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ExecOutput {
    /// Successful empty output.
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    /// Successful output with the given stdout.
    pub fn with_stdout(stdout: &str) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.to_string(),
            ..Self::default()
        }
    }

    /// Failed output with the given exit code.
    pub fn failed(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    /// Whether the command exited zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability surface the orchestrator uses to touch the live system:
/// process spawning, tool lookup, and file probes. Business logic never
/// reaches the environment except through this trait, so tests can swap
/// in a scripted double.
#[allow(async_fn_in_trait)]
pub trait CommandBackend {
    /// Spawn the command and wait for it, capturing output.
    async fn run(&self, invocation: &Invocation) -> io::Result<ExecOutput>;

    /// Locate an external tool on PATH.
    fn find_tool(&self, name: &str) -> Option<PathBuf>;

    /// Probe for an existing file (helper binaries, service descriptors).
    fn file_exists(&self, path: &Path) -> bool;
}

/// Backend that runs commands on the real system.
pub struct SystemBackend;

impl CommandBackend for SystemBackend {
    async fn run(&self, invocation: &Invocation) -> io::Result<ExecOutput> {
        let output = match &invocation.kind {
            InvocationKind::Argv(argv) => {
                let Some((program, args)) = argv.split_first() else {
                    return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty argv"));
                };
                Command::new(program).args(args).output().await?
            }
            InvocationKind::Shell(command) => {
                Command::new("sh").arg("-c").arg(command).output().await?
            }
        };
        Ok(ExecOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn find_tool(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// How a mutating command treats failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    /// Failure aborts the current operation.
    Mandatory,
    /// Failure is logged and tolerated.
    BestEffort,
}

/// What happened to a mutating command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Executed and exited zero.
    Ok,
    /// Failed (or could not be spawned) and the failure was tolerated.
    Tolerated,
    /// Dry-run: printed instead of executed, treated as success.
    Skipped,
}

/// Dry-run-aware command runner shared by all components.
pub struct Executor<B> {
    backend: B,
    dry_run: bool,
}

impl<B: CommandBackend> Executor<B> {
    /// Wrap a backend in the given execution mode.
    pub fn new(backend: B, dry_run: bool) -> Self {
        Self { backend, dry_run }
    }

    /// Whether mutating commands are printed instead of executed.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Locate an external tool on PATH.
    pub fn find_tool(&self, name: &str) -> Option<PathBuf> {
        self.backend.find_tool(name)
    }

    /// Probe for an existing file.
    pub fn file_exists(&self, path: &Path) -> bool {
        self.backend.file_exists(path)
    }

    /// Read-only query. Executes in dry-run mode too; probes do not
    /// mutate and both modes must observe the same system state.
    pub async fn capture(&self, argv: &[&str]) -> Result<ExecOutput, HotspotError> {
        let invocation = Invocation::argv(argv.iter().copied());
        self.backend
            .run(&invocation)
            .await
            .map_err(|err| HotspotError::CommandFailed {
                command: invocation.display_line(),
                code: None,
                stderr: err.to_string(),
            })
    }

    /// Mutating command. In dry-run mode the command line is printed and
    /// a synthetic success is returned so callers branch exactly as they
    /// would in real execution.
    pub async fn run(
        &self,
        invocation: Invocation,
        tolerance: Tolerance,
    ) -> Result<RunStatus, HotspotError> {
        if self.dry_run {
            println!("→ {invocation}");
            return Ok(RunStatus::Skipped);
        }
        match self.backend.run(&invocation).await {
            Ok(output) if output.success() => Ok(RunStatus::Ok),
            Ok(output) => match tolerance {
                Tolerance::BestEffort => {
                    log::warn!(
                        "`{}` failed (exit {:?}): {}",
                        invocation.display_line(),
                        output.code,
                        output.stderr.trim()
                    );
                    Ok(RunStatus::Tolerated)
                }
                Tolerance::Mandatory => Err(HotspotError::CommandFailed {
                    command: invocation.display_line(),
                    code: output.code,
                    stderr: output.stderr.trim().to_string(),
                }),
            },
            Err(err) => match tolerance {
                Tolerance::BestEffort => {
                    log::warn!("could not run `{}`: {}", invocation.display_line(), err);
                    Ok(RunStatus::Tolerated)
                }
                Tolerance::Mandatory => Err(HotspotError::CommandFailed {
                    command: invocation.display_line(),
                    code: None,
                    stderr: err.to_string(),
                }),
            },
        }
    }
}
