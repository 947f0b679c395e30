//! # Command Executor
//!
//! Runs one extracted command through the host shell and returns whatever it
//! printed. Execution never fails from the caller's point of view: spawn
//! errors, wait errors and timeouts come back as a diagnostic string, so the
//! output can be handed to the model like any other result.

use std::fmt;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

/// Default wait before a command is killed
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Prefix of every synthesized failure message
pub const ERROR_PREFIX: &str = "Error executing command: ";

/// Something that can run a command line and report its output as text
#[allow(async_fn_in_trait)]
pub trait Executor {
    /// Run `command` and return stdout followed by stderr, or a diagnostic
    async fn execute(&self, command: &str) -> String;
}

/// Runs commands with `sh -c` (or `cmd /C` on Windows)
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    program: String,
    flag: String,
    timeout: Duration,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl ShellExecutor {
    pub fn new(timeout: Duration) -> Self {
        let (program, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };
        Self {
            program: program.to_string(),
            flag: flag.to_string(),
            timeout,
        }
    }

    /// Use a different interpreter, e.g. `("bash", "-lc")`
    pub fn with_shell(mut self, program: impl Into<String>, flag: impl Into<String>) -> Self {
        self.program = program.into();
        self.flag = flag.into();
        self
    }

    async fn run(&self, command: &str) -> Result<String, ExecFailure> {
        let child = Command::new(&self.program)
            .arg(&self.flag)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(ExecFailure::Spawn)?;

        // dropping the wait future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(ExecFailure::Wait)?,
            Err(_) => {
                return Err(ExecFailure::TimedOut {
                    command: command.to_string(),
                    timeout: self.timeout,
                })
            }
        };

        debug!(status = %output.status, "command exited");

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

impl Executor for ShellExecutor {
    async fn execute(&self, command: &str) -> String {
        let started = Instant::now();
        match self.run(command).await {
            Ok(output) => {
                debug!(
                    command,
                    bytes = output.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "command finished"
                );
                output
            }
            Err(failure) => {
                warn!(command, error = %failure, "command failed");
                format!("{}{}", ERROR_PREFIX, failure)
            }
        }
    }
}

#[derive(Debug)]
enum ExecFailure {
    Spawn(std::io::Error),
    Wait(std::io::Error),
    TimedOut { command: String, timeout: Duration },
}

impl fmt::Display for ExecFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to start shell: {}", e),
            Self::Wait(e) => write!(f, "failed to collect output: {}", e),
            Self::TimedOut { command, timeout } => write!(
                f,
                "Command '{}' timed out after {} seconds",
                command,
                timeout.as_secs_f64()
            ),
        }
    }
}
