use std::process::Stdio;

use tokio::process::Command;

use crate::{InpaintRequest, InpaintTool, ToolOutput, error::ToolError};

const DEFAULT_PROGRAM: &str = "iopaint";

/// Runs the `iopaint` command line as a child process.
///
/// The command is `<program> [args...] run --model=.. --device=.. --image=..
/// --mask=.. --output=..`, where `args` lets the program be a launcher such
/// as `python -m iopaint`.
#[derive(Clone, Debug)]
pub struct IopaintCli {
    program: String,
    args: Vec<String>,
}

impl Default for IopaintCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl IopaintCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds arguments placed between the program and the `run` subcommand.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The full command line for `request`, program first.
    pub fn command_line(&self, request: &InpaintRequest) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .chain(request.tool_args())
            .collect()
    }
}

impl InpaintTool for IopaintCli {
    type Error = ToolError;

    async fn run(&self, request: &InpaintRequest) -> Result<ToolOutput, Self::Error> {
        log::info!("Executing command: {}", self.command_line(request).join(" "));

        // The child is killed if the handler future is dropped mid-run, and
        // tokio reaps it in the background.
        let child = Command::new(&self.program)
            .args(&self.args)
            .args(request.tool_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| ToolError::Wait {
                program: self.program.clone(),
                source,
            })?;

        log::debug!("Command exited with {}", output.status);

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
