//! Sandbox runtime control
//!
//! The sandbox is an externally managed, isolated runtime whose per-run
//! storage self-destructs after execution. It is addressed here by a stable
//! identifier resolved once from a human-readable name; no operation relies
//! on an implicit "current" sandbox, so concurrent sandboxes cannot race a
//! freeze.
//!
//! The production implementation shells out to the sandbox control program
//! (`sandboxctl`, overridable via `FROST_SANDBOX_CTL`):
//!
//! - `sandboxctl list --json` → inventory
//! - `sandboxctl boot <id>` → idempotent boot
//! - `sandboxctl run --id <id> [--env K=V]... -- <cmd>...` → combined
//!   build-and-test execution inside the sandbox

use serde::Deserialize;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Environment variable naming the sandbox control program
pub const SANDBOX_CTL_ENV: &str = "FROST_SANDBOX_CTL";
/// Default sandbox control program
pub const DEFAULT_SANDBOX_CTL: &str = "sandboxctl";

/// One sandbox in the runtime's inventory
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxInfo {
    /// Stable identifier; all operations address this
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Runtime state, e.g. `booted` or `shutdown`
    #[serde(default)]
    pub state: String,
}

/// A command to run inside a booted sandbox
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Stable sandbox identifier
    pub sandbox_id: String,
    /// Environment exported into the sandboxed process
    pub env: Vec<(String, String)>,
    /// Program and arguments
    pub command: Vec<String>,
}

/// Captured result of an external process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Whether the process exited successfully
    pub status_ok: bool,
    /// Combined stdout and stderr, retained verbatim for diagnosis
    pub combined: String,
}

/// Seam over the external sandbox runtime
///
/// Implementations must make `boot` idempotent: booting an already-booted
/// sandbox is success. `run` returns `Ok` with `status_ok = false` for a
/// process that ran and failed; `Err` is reserved for control failures.
pub trait SandboxRuntime {
    /// Enumerate available sandboxes
    ///
    /// # Errors
    /// Returns [`SandboxError`] when the control program fails or its
    /// inventory cannot be parsed.
    fn list(&self) -> Result<Vec<SandboxInfo>, SandboxError>;

    /// Boot a sandbox by stable identifier (idempotent)
    ///
    /// # Errors
    /// Returns [`SandboxError::ControlFailed`] on a non-"already booted"
    /// boot failure.
    fn boot(&self, id: &str) -> Result<(), SandboxError>;

    /// Execute a command inside a booted sandbox
    ///
    /// # Errors
    /// Returns [`SandboxError::Spawn`] when the control program itself
    /// cannot be started.
    fn run(&self, request: &RunRequest) -> Result<ProcessOutput, SandboxError>;
}

/// Resolve a human-readable sandbox name to its stable identifier
///
/// # Errors
/// Returns [`SandboxError::NotFound`] listing the available names when no
/// sandbox carries the requested name.
pub fn resolve_sandbox(
    runtime: &dyn SandboxRuntime,
    name: &str,
) -> Result<SandboxInfo, SandboxError> {
    let inventory = runtime.list()?;
    inventory
        .iter()
        .find(|s| s.name == name)
        .cloned()
        .ok_or_else(|| SandboxError::NotFound {
            name: name.to_string(),
            available: inventory.into_iter().map(|s| s.name).collect(),
        })
}

/// Process-backed sandbox runtime
#[derive(Debug, Clone)]
pub struct ProcessSandboxRuntime {
    program: PathBuf,
}

impl ProcessSandboxRuntime {
    /// Use an explicit control program
    #[inline]
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use the control program from `FROST_SANDBOX_CTL`, or the default
    #[must_use]
    pub fn from_env() -> Self {
        let program = std::env::var(SANDBOX_CTL_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SANDBOX_CTL));
        Self { program }
    }

    fn invoke(&self, args: &[String]) -> Result<ProcessOutput, SandboxError> {
        tracing::debug!(program = %self.program.display(), ?args, "invoking sandbox control");
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| SandboxError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(ProcessOutput {
            status_ok: output.status.success(),
            combined,
        })
    }
}

impl SandboxRuntime for ProcessSandboxRuntime {
    fn list(&self) -> Result<Vec<SandboxInfo>, SandboxError> {
        let output = self.invoke(&["list".to_string(), "--json".to_string()])?;
        if !output.status_ok {
            return Err(SandboxError::ControlFailed {
                operation: "list".to_string(),
                output: output.combined,
            });
        }
        serde_json::from_str(&output.combined).map_err(|source| SandboxError::InventoryParse {
            source,
            output: output.combined,
        })
    }

    fn boot(&self, id: &str) -> Result<(), SandboxError> {
        let output = self.invoke(&["boot".to_string(), id.to_string()])?;
        if output.status_ok || output.combined.contains("already booted") {
            return Ok(());
        }
        Err(SandboxError::ControlFailed {
            operation: format!("boot {id}"),
            output: output.combined,
        })
    }

    fn run(&self, request: &RunRequest) -> Result<ProcessOutput, SandboxError> {
        let mut args = vec![
            "run".to_string(),
            "--id".to_string(),
            request.sandbox_id.clone(),
        ];
        for (key, value) in &request.env {
            args.push("--env".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push("--".to_string());
        args.extend(request.command.iter().cloned());
        self.invoke(&args)
    }
}

/// Errors from sandbox control
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// The named sandbox is absent from the inventory
    #[error("sandbox '{name}' not found; available: {}", available.join(", "))]
    NotFound {
        /// The requested sandbox name
        name: String,
        /// Names present in the inventory
        available: Vec<String>,
    },

    /// The control program reported failure; raw output retained
    #[error("sandbox control '{operation}' failed:\n{output}")]
    ControlFailed {
        /// The failed control operation
        operation: String,
        /// Combined stdout/stderr of the control program
        output: String,
    },

    /// The control program could not be started at all
    #[error("cannot start sandbox control program {}: {source}", program.display())]
    Spawn {
        /// The program that failed to start
        program: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Inventory output was not valid JSON
    #[error("cannot parse sandbox inventory: {source}\noutput was:\n{output}")]
    InventoryParse {
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
        /// The unparseable output
        output: String,
    },
}
