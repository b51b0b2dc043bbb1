pub mod config;
pub mod gpu;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::core::ViewerConfig;
pub use gpu::{GlApi, NativeGl};
pub use render::shaders::ShaderProgramBuilder;
pub use render::surface::{RenderSurface, RenderSurfaceController, SurfaceState};
pub use utils::error::{RenderError, ShaderError, StageFailure, TextureError};
