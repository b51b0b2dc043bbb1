pub mod error;

pub use error::{RenderError, ShaderError, StageFailure, TextureError};
