use std::ffi::NulError;
use std::fmt;
use thiserror::Error;

use crate::render::shaders::ShaderStage;

/// Compiler diagnostics for one stage that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: ShaderStage,
    pub log: String,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shader compilation failed: {}", self.stage, self.log)
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    /// Every stage that failed, in compile order.
    #[error("{}", join_failures(.0))]
    Compile(Vec<StageFailure>),

    #[error("Shader program linking failed: {log}")]
    Link { log: String },

    #[error("Null byte in shader source: {0}")]
    Nul(#[from] NulError),
}

impl ShaderError {
    pub fn failed_stages(&self) -> Vec<ShaderStage> {
        match self {
            ShaderError::Compile(failures) => failures.iter().map(|f| f.stage).collect(),
            _ => Vec::new(),
        }
    }
}

fn join_failures(failures: &[StageFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image too large for upload: {width}x{height}")]
    TooLarge { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to initialize OpenGL context (error 0x{0:04X})")]
    Context(u32),
}

pub type Result<T> = std::result::Result<T, RenderError>;
