pub mod mesh;
pub mod shaders;
pub mod surface;
pub mod texture;

pub use mesh::{vertex_stage, GeometryBuffer, QuadVertex};
pub use shaders::{LinkedProgram, ShaderProgramBuilder, ShaderSource, ShaderStage};
pub use surface::{RenderSurface, RenderSurfaceController, SurfaceSettings, SurfaceState};
pub use texture::{DecodedImage, Texture};
