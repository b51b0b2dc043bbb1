// shaders.rs - Shader compilation and program linking

use std::ffi::{CString, NulError};
use std::fmt;

use crate::gpu::{GlApi, ProgramHandle, ShaderHandle};
use crate::utils::error::{ShaderError, StageFailure};

/// Longest compiler or linker log kept, matching a 512-byte C buffer.
pub const MAX_INFO_LOG_LEN: usize = 511;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Compile order used by [`ShaderProgramBuilder`].
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("Vertex"),
            ShaderStage::Fragment => f.write_str("Fragment"),
        }
    }
}

/// A vertex/fragment pair of complete GLSL programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    vertex: String,
    fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// Sources for the textured full-screen quad
pub mod quad_shaders {
    use super::ShaderSource;

    /// Passes positions through and flips v so image row 0 lands on top.
    pub const VERTEX_SRC: &str = r#"#version 330 core
layout(location = 0) in vec2 aPos;
layout(location = 1) in vec2 aTexCoord;
out vec2 TexCoord;
void main() {
  gl_Position = vec4(aPos, 0.0, 1.0);
  TexCoord = vec2(aTexCoord.x, 1.0 - aTexCoord.y);
}
"#;

    pub const FRAGMENT_SRC: &str = r#"#version 330 core
out vec4 FragColor;
in vec2 TexCoord;
uniform sampler2D texture1;
void main() {
  FragColor = texture(texture1, TexCoord);
}
"#;

    pub fn source() -> ShaderSource {
        ShaderSource::new(VERTEX_SRC, FRAGMENT_SRC)
    }
}

/// One stage after a compile attempt. Deleted by the builder once linking
/// has been tried.
#[derive(Debug)]
struct CompiledShader {
    handle: ShaderHandle,
    stage: ShaderStage,
    compiled: bool,
    log: String,
}

impl CompiledShader {
    fn failure(&self) -> Option<StageFailure> {
        (!self.compiled).then(|| StageFailure {
            stage: self.stage,
            log: self.log.clone(),
        })
    }

    fn release(self, gl: &mut impl GlApi) {
        gl.delete_shader(self.handle);
    }
}

/// Result of a link attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedProgram {
    handle: ProgramHandle,
    linked: bool,
    log: String,
}

impl LinkedProgram {
    /// A program that failed to build; `handle` is the zero name.
    pub fn invalid(log: impl Into<String>) -> Self {
        Self {
            handle: ProgramHandle::INVALID,
            linked: false,
            log: truncate_log(&log.into()),
        }
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn linked(&self) -> bool {
        self.linked
    }

    pub fn log(&self) -> &str {
        &self.log
    }
}

/// Cuts a driver log to [`MAX_INFO_LOG_LEN`] bytes on a char boundary and
/// drops trailing whitespace.
pub fn truncate_log(log: &str) -> String {
    truncate_to(log, MAX_INFO_LOG_LEN)
}

fn truncate_to(log: &str, max_len: usize) -> String {
    let mut end = log.len().min(max_len);
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    log[..end].trim_end_matches(['\0', ' ', '\n', '\r', '\t']).to_string()
}

/// Renders a build error into at most [`MAX_INFO_LOG_LEN`] bytes. Each failed
/// stage gets an equal share so every stage name survives the cut.
fn summarize(err: &ShaderError) -> String {
    match err {
        ShaderError::Compile(failures) if !failures.is_empty() => {
            let share = (MAX_INFO_LOG_LEN + 1) / failures.len() - 1;
            failures
                .iter()
                .map(|failure| truncate_to(&failure.to_string(), share))
                .collect::<Vec<_>>()
                .join("\n")
        }
        other => truncate_log(&other.to_string()),
    }
}

/// Compiles a [`ShaderSource`] and links it into a program.
///
/// Both stages are always compiled so one pass reports every diagnostic.
/// The intermediate shader objects never outlive [`build`](Self::build).
#[derive(Debug, Default, Clone, Copy)]
pub struct ShaderProgramBuilder;

impl ShaderProgramBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        gl: &mut impl GlApi,
        source: &ShaderSource,
    ) -> Result<LinkedProgram, ShaderError> {
        let sources = ShaderStage::ALL
            .into_iter()
            .map(|stage| CString::new(source.stage(stage)).map(|src| (stage, src)))
            .collect::<Result<Vec<_>, NulError>>()?;

        let shaders: Vec<CompiledShader> = sources
            .iter()
            .map(|(stage, src)| Self::compile(gl, *stage, src))
            .collect();

        let failures: Vec<StageFailure> =
            shaders.iter().filter_map(CompiledShader::failure).collect();
        if !failures.is_empty() {
            for shader in shaders {
                shader.release(gl);
            }
            return Err(ShaderError::Compile(failures));
        }

        let program = gl.create_program();
        for shader in &shaders {
            gl.attach_shader(program, shader.handle);
        }
        gl.link_program(program);
        for shader in shaders {
            shader.release(gl);
        }

        if !gl.program_link_status(program) {
            let log = truncate_log(&gl.program_info_log(program, MAX_INFO_LOG_LEN));
            log::warn!("Shader program linking failed: {}", log);
            gl.delete_program(program);
            return Err(ShaderError::Link { log });
        }

        log::debug!("Linked shader program {}", program.0);
        Ok(LinkedProgram {
            handle: program,
            linked: true,
            log: String::new(),
        })
    }

    /// Like [`build`](Self::build), but a failure becomes an invalid program
    /// carrying the error text instead of an `Err`.
    pub fn build_lenient(&self, gl: &mut impl GlApi, source: &ShaderSource) -> LinkedProgram {
        match self.build(gl, source) {
            Ok(program) => program,
            Err(err) => LinkedProgram::invalid(summarize(&err)),
        }
    }

    fn compile(
        gl: &mut impl GlApi,
        stage: ShaderStage,
        source: &std::ffi::CStr,
    ) -> CompiledShader {
        let handle = gl.create_shader(stage);
        gl.shader_source(handle, source);
        gl.compile_shader(handle);

        let compiled = gl.shader_compile_status(handle);
        let log = if compiled {
            String::new()
        } else {
            let log = truncate_log(&gl.shader_info_log(handle, MAX_INFO_LOG_LEN));
            log::warn!("Shader compilation failed ({}): {}", stage, log);
            log
        };

        CompiledShader {
            handle,
            stage,
            compiled,
            log,
        }
    }
}
