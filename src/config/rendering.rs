use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Requested OpenGL core profile version.
    pub gl_major: u8,
    pub gl_minor: u8,
    /// Zero requests a surface without a depth buffer.
    pub depth_bits: u8,
    pub texture_path: PathBuf,
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gl_major: 3,
            gl_minor: 3,
            depth_bits: 24,
            texture_path: PathBuf::from("assets/texture.png"),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RenderConfig {
    pub fn has_depth(&self) -> bool {
        self.depth_bits > 0
    }
}
