//! HTTP façade around the `iopaint` inpainting command line.
//!
//! The service validates the paths of an inpainting request, prepares the
//! output directory, runs the external tool and reports its outcome. Two
//! auxiliary endpoints list the images of a directory and serve a single
//! image file back to the caller.

pub mod error;
pub mod handlers;
pub mod messages;
pub mod router;
pub mod tool;

pub use error::{ApiError, ToolError};
pub use messages::{ImageList, InpaintRequest, InpaintResponse, PathQuery};
pub use router::{AppState, build_router, serve};
pub use tool::IopaintCli;

/// Trait for implementing the external program that performs the inpainting.
///
/// The service only observes the tool through [`ToolOutput`]: the exit code
/// decides success, the captured streams are handed back to the caller.
pub trait InpaintTool: Send + Sync + 'static {
    /// The error type returned when the tool cannot be run at all.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs the tool for the given request and waits for it to finish.
    ///
    /// A tool that ran and exited with a non-zero code is not an error: it
    /// is reported through [`ToolOutput::code`].
    fn run(
        &self,
        request: &InpaintRequest,
    ) -> impl Future<Output = Result<ToolOutput, Self::Error>> + Send;
}

/// Exit code and captured output of a finished tool run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// The exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Everything the tool wrote to standard output.
    pub stdout: String,
    /// Everything the tool wrote to standard error.
    pub stderr: String,
}

impl ToolOutput {
    /// Returns true when the tool exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}
