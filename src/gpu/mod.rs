//! The GPU boundary.
//!
//! Everything the renderer asks of the driver goes through [`GlApi`]. The
//! trait is deliberately narrow: it covers only the calls needed to build one
//! shader program, upload one texture and one indexed mesh, and draw it.

use std::ffi::CStr;

use crate::render::shaders::ShaderStage;

pub mod native;

pub use native::NativeGl;

/// GL's "no error" value for [`GlApi::get_error`].
pub const NO_ERROR: u32 = 0;

macro_rules! gl_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub u32);

        impl $name {
            /// Zero is never a live object name.
            pub const INVALID: Self = Self(0);

            pub fn is_valid(self) -> bool {
                self.0 != 0
            }
        }
    };
}

gl_handle!(
    /// Name of a shader object.
    ShaderHandle
);
gl_handle!(
    /// Name of a program object.
    ProgramHandle
);
gl_handle!(TextureHandle);
gl_handle!(BufferHandle);
gl_handle!(VertexArrayHandle);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureParameter {
    WrapS(WrapMode),
    WrapT(WrapMode),
    MinFilter(FilterMode),
    MagFilter(FilterMode),
}

/// One float vertex attribute inside an interleaved buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: u32,
    /// Byte offset inside one vertex.
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

/// The subset of OpenGL 3.3 core used by the renderer.
///
/// Calls take `&mut self` because every one of them mutates context state.
/// Implementations must only be used on the thread that owns the context.
pub trait GlApi {
    /// Returns and clears the oldest pending error flag.
    fn get_error(&mut self) -> u32;

    fn create_shader(&mut self, stage: ShaderStage) -> ShaderHandle;
    fn shader_source(&mut self, shader: ShaderHandle, source: &CStr);
    fn compile_shader(&mut self, shader: ShaderHandle);
    fn shader_compile_status(&mut self, shader: ShaderHandle) -> bool;
    /// At most `max_len` bytes of the shader's info log.
    fn shader_info_log(&mut self, shader: ShaderHandle, max_len: usize) -> String;
    fn delete_shader(&mut self, shader: ShaderHandle);

    fn create_program(&mut self) -> ProgramHandle;
    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);
    fn link_program(&mut self, program: ProgramHandle);
    fn program_link_status(&mut self, program: ProgramHandle) -> bool;
    fn program_info_log(&mut self, program: ProgramHandle, max_len: usize) -> String;
    fn use_program(&mut self, program: ProgramHandle);
    fn delete_program(&mut self, program: ProgramHandle);

    fn create_texture(&mut self) -> TextureHandle;
    fn bind_texture(&mut self, texture: TextureHandle);
    fn tex_parameter(&mut self, parameter: TextureParameter);
    /// Uploads tightly packed RGBA8 rows as level 0 of the bound texture.
    fn tex_image_2d_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]);
    fn generate_mipmap(&mut self);
    fn delete_texture(&mut self, texture: TextureHandle);

    fn create_vertex_array(&mut self) -> VertexArrayHandle;
    fn bind_vertex_array(&mut self, vao: VertexArrayHandle);
    fn delete_vertex_array(&mut self, vao: VertexArrayHandle);

    fn create_buffer(&mut self) -> BufferHandle;
    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferHandle);
    /// Static-draw upload into the buffer bound at `target`.
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Describes a float attribute sourced from the bound array buffer.
    fn vertex_attrib_pointer(&mut self, attribute: VertexAttribute, stride: usize);
    fn enable_vertex_attrib_array(&mut self, location: u32);

    fn viewport(&mut self, width: u32, height: u32);
    fn clear_color(&mut self, rgba: [f32; 4]);
    fn clear(&mut self, mask: ClearMask);
    /// Indexed triangle list with `u32` indices from the bound element buffer.
    fn draw_triangles_u32(&mut self, index_count: usize);
}
