//! External process execution.
//!
//! `git`, `argocd` and `kubectl` are driven through [`CommandRunner`] so the
//! adapters built on them can be tested without the tools installed.

use std::{
    fmt,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tracing::{debug, instrument};

use argoboot_core::{application::ApplicationError, error::BootstrapResult};

const REDACTED: &str = "****";

/// A command line to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    /// Values masked whenever the command is displayed.
    secrets: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            secrets: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Mask `value` in every rendering of this command.
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.push(value);
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Mask every registered secret in `text`.
    pub fn redact(&self, text: &str) -> String {
        self.secrets
            .iter()
            .fold(text.to_string(), |acc, secret| acc.replace(secret, REDACTED))
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&self.redact(&line))
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// stderr and stdout combined, or the exit code when both are empty.
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        let stdout = self.stdout.trim();
        match (stderr.is_empty(), stdout.is_empty()) {
            (false, false) => format!("{stderr}\n{stdout}"),
            (false, true) => stderr.to_string(),
            (true, false) => stdout.to_string(),
            (true, true) => match self.code {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by signal".to_string(),
            },
        }
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs external commands.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion. A non-zero exit is not an error here;
    /// only failing to start the process is.
    fn run(&self, command: &CommandSpec) -> BootstrapResult<CommandOutput>;

    /// Run `command` and fail unless it exits successfully.
    fn run_checked(&self, command: &CommandSpec) -> BootstrapResult<CommandOutput> {
        let output = self.run(command)?;
        if output.success {
            Ok(output)
        } else {
            Err(ApplicationError::CommandFailed {
                command: command.to_string(),
                reason: command.redact(&output.failure_reason()),
            }
            .into())
        }
    }
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(command = %command))]
    fn run(&self, command: &CommandSpec) -> BootstrapResult<CommandOutput> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| ApplicationError::CommandFailed {
            command: command.to_string(),
            reason: format!("failed to start: {e}"),
        })?;

        let output = CommandOutput::from(output);
        debug!(success = output.success, code = ?output.code, "Command finished");
        Ok(output)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner for adapter tests.

    use std::{collections::VecDeque, sync::Mutex};

    use super::*;

    /// Records every command and answers from a script.
    ///
    /// Commands without a scripted answer succeed with empty output.
    #[derive(Default)]
    pub struct RecordingRunner {
        calls: Mutex<Vec<CommandSpec>>,
        replies: Mutex<VecDeque<(String, CommandOutput)>>,
    }

    impl RecordingRunner {
        /// Answer the next command whose display contains `needle`.
        pub fn reply(self, needle: &str, output: CommandOutput) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back((needle.to_string(), output));
            self
        }

        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().unwrap().clone()
        }

        /// Every command as displayed (secrets masked).
        pub fn lines(&self) -> Vec<String> {
            self.calls().iter().map(ToString::to_string).collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, command: &CommandSpec) -> BootstrapResult<CommandOutput> {
            self.calls.lock().unwrap().push(command.clone());

            let line = command.to_string();
            let mut replies = self.replies.lock().unwrap();
            match replies.iter().position(|(needle, _)| line.contains(needle)) {
                Some(i) => Ok(replies.remove(i).map(|(_, out)| out).unwrap()),
                None => Ok(CommandOutput::ok("")),
            }
        }
    }
}
