use serde::{Deserialize, Serialize};

use crate::ToolOutput;

const DEFAULT_MODEL: &str = "lama";
const DEFAULT_DEVICE: &str = "cuda";

/// Body of `POST /api/iopaint`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InpaintRequest {
    pub image_path: String,
    pub mask_path: String,
    pub output_path: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_device")]
    pub device: String,
    /// Delete `output_path` before running the tool.
    #[serde(default = "default_clear_output")]
    pub clear_output: bool,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_device() -> String {
    DEFAULT_DEVICE.to_string()
}

fn default_clear_output() -> bool {
    true
}

impl InpaintRequest {
    /// Creates a request with the default model, device and clearing policy.
    pub fn new(
        image_path: impl Into<String>,
        mask_path: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            mask_path: mask_path.into(),
            output_path: output_path.into(),
            model: default_model(),
            device: default_device(),
            clear_output: default_clear_output(),
        }
    }

    /// Arguments passed to the tool, starting with the `run` subcommand.
    pub fn tool_args(&self) -> Vec<String> {
        vec![
            "run".to_string(),
            format!("--model={}", self.model),
            format!("--device={}", self.device),
            format!("--image={}", self.image_path),
            format!("--mask={}", self.mask_path),
            format!("--output={}", self.output_path),
        ]
    }
}

/// Outcome of a tool run. Both variants are sent with a 200 status.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct InpaintResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ToolOutput> for InpaintResponse {
    fn from(output: ToolOutput) -> Self {
        if output.success() {
            Self {
                success: true,
                message: "IOPaint completed successfully!".to_string(),
                output: Some(output.stdout),
                error: None,
            }
        } else {
            Self {
                success: false,
                message: "IOPaint failed".to_string(),
                output: None,
                error: Some(output.stderr),
            }
        }
    }
}

/// Query string of the listing and serving endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ImageList {
    pub images: Vec<String>,
}
