use gl::types::*;
use std::ffi::{c_void, CStr};
use std::marker::PhantomData;
use std::ptr;

use super::{
    BufferHandle, BufferTarget, ClearMask, FilterMode, GlApi, ProgramHandle, ShaderHandle,
    TextureHandle, TextureParameter, VertexArrayHandle, VertexAttribute, WrapMode,
};
use crate::render::shaders::ShaderStage;

/// [`GlApi`] backed by the global function pointers of the `gl` crate.
///
/// Only constructible through [`NativeGl::load_with`], so a value existing
/// means the pointers were loaded for a current context.
pub struct NativeGl {
    // The context is bound to one thread.
    _not_send: PhantomData<*const ()>,
}

impl NativeGl {
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self {
            _not_send: PhantomData,
        }
    }
}

fn target_enum(target: BufferTarget) -> GLenum {
    match target {
        BufferTarget::Array => gl::ARRAY_BUFFER,
        BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn wrap_enum(mode: WrapMode) -> GLint {
    match mode {
        WrapMode::Repeat => gl::REPEAT as GLint,
        WrapMode::ClampToEdge => gl::CLAMP_TO_EDGE as GLint,
    }
}

fn filter_enum(mode: FilterMode) -> GLint {
    match mode {
        FilterMode::Nearest => gl::NEAREST as GLint,
        FilterMode::Linear => gl::LINEAR as GLint,
    }
}

fn read_info_log(
    max_len: usize,
    fetch: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    // +1 for the terminating NUL the driver always writes.
    let mut buffer: Vec<u8> = vec![0; max_len + 1];
    let mut written: GLsizei = 0;
    fetch(buffer.len() as GLsizei, &mut written, buffer.as_mut_ptr().cast());
    buffer.truncate(usize::try_from(written).unwrap_or(0).min(max_len));
    String::from_utf8_lossy(&buffer).into_owned()
}

impl GlApi for NativeGl {
    fn get_error(&mut self) -> u32 {
        unsafe { gl::GetError() }
    }

    fn create_shader(&mut self, stage: ShaderStage) -> ShaderHandle {
        let kind = match stage {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        };
        ShaderHandle(unsafe { gl::CreateShader(kind) })
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &CStr) {
        unsafe {
            gl::ShaderSource(shader.0, 1, &source.as_ptr(), ptr::null());
        }
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        unsafe { gl::CompileShader(shader.0) }
    }

    fn shader_compile_status(&mut self, shader: ShaderHandle) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&mut self, shader: ShaderHandle, max_len: usize) -> String {
        read_info_log(max_len, |size, written, out| unsafe {
            gl::GetShaderInfoLog(shader.0, size, written, out);
        })
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        unsafe { gl::DeleteShader(shader.0) }
    }

    fn create_program(&mut self) -> ProgramHandle {
        ProgramHandle(unsafe { gl::CreateProgram() })
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe { gl::AttachShader(program.0, shader.0) }
    }

    fn link_program(&mut self, program: ProgramHandle) {
        unsafe { gl::LinkProgram(program.0) }
    }

    fn program_link_status(&mut self, program: ProgramHandle) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&mut self, program: ProgramHandle, max_len: usize) -> String {
        read_info_log(max_len, |size, written, out| unsafe {
            gl::GetProgramInfoLog(program.0, size, written, out);
        })
    }

    fn use_program(&mut self, program: ProgramHandle) {
        unsafe { gl::UseProgram(program.0) }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        unsafe { gl::DeleteProgram(program.0) }
    }

    fn create_texture(&mut self) -> TextureHandle {
        let mut id = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        TextureHandle(id)
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, texture.0) }
    }

    fn tex_parameter(&mut self, parameter: TextureParameter) {
        let (name, value) = match parameter {
            TextureParameter::WrapS(mode) => (gl::TEXTURE_WRAP_S, wrap_enum(mode)),
            TextureParameter::WrapT(mode) => (gl::TEXTURE_WRAP_T, wrap_enum(mode)),
            TextureParameter::MinFilter(mode) => (gl::TEXTURE_MIN_FILTER, filter_enum(mode)),
            TextureParameter::MagFilter(mode) => (gl::TEXTURE_MAG_FILTER, filter_enum(mode)),
        };
        unsafe { gl::TexParameteri(gl::TEXTURE_2D, name, value) }
    }

    fn tex_image_2d_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr().cast(),
            );
        }
    }

    fn generate_mipmap(&mut self) {
        unsafe { gl::GenerateMipmap(gl::TEXTURE_2D) }
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        unsafe { gl::DeleteTextures(1, &texture.0) }
    }

    fn create_vertex_array(&mut self) -> VertexArrayHandle {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        VertexArrayHandle(id)
    }

    fn bind_vertex_array(&mut self, vao: VertexArrayHandle) {
        unsafe { gl::BindVertexArray(vao.0) }
    }

    fn delete_vertex_array(&mut self, vao: VertexArrayHandle) {
        unsafe { gl::DeleteVertexArrays(1, &vao.0) }
    }

    fn create_buffer(&mut self) -> BufferHandle {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        BufferHandle(id)
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferHandle) {
        unsafe { gl::BindBuffer(target_enum(target), buffer.0) }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        unsafe {
            gl::BufferData(
                target_enum(target),
                data.len() as GLsizeiptr,
                data.as_ptr().cast(),
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        unsafe { gl::DeleteBuffers(1, &buffer.0) }
    }

    fn vertex_attrib_pointer(&mut self, attribute: VertexAttribute, stride: usize) {
        unsafe {
            gl::VertexAttribPointer(
                attribute.location,
                attribute.components as GLint,
                gl::FLOAT,
                gl::FALSE,
                stride as GLsizei,
                attribute.offset as *const c_void,
            );
        }
    }

    fn enable_vertex_attrib_array(&mut self, location: u32) {
        unsafe { gl::EnableVertexAttribArray(location) }
    }

    fn viewport(&mut self, width: u32, height: u32) {
        let width = GLsizei::try_from(width).unwrap_or(GLsizei::MAX);
        let height = GLsizei::try_from(height).unwrap_or(GLsizei::MAX);
        unsafe { gl::Viewport(0, 0, width, height) }
    }

    fn clear_color(&mut self, [r, g, b, a]: [f32; 4]) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&mut self, mask: ClearMask) {
        let mut bits: GLbitfield = 0;
        if mask.color {
            bits |= gl::COLOR_BUFFER_BIT;
        }
        if mask.depth {
            bits |= gl::DEPTH_BUFFER_BIT;
        }
        if bits != 0 {
            unsafe { gl::Clear(bits) }
        }
    }

    fn draw_triangles_u32(&mut self, index_count: usize) {
        unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                index_count as GLsizei,
                gl::UNSIGNED_INT,
                ptr::null(),
            );
        }
    }
}
