//! Lifecycle of the GPU objects behind one drawing surface.
//!
//! A surface is either unrealized (no GPU objects) or realized (texture,
//! quad buffers and program all allocated). The owner of the GL context
//! drives the transitions through [`RenderSurface`]:
//!
//! ```text
//! Unrealized --initialize()--> Realized --render()*--> Realized --release()--> Unrealized
//! ```
//!
//! Decode, compile and link failures do not stop the transition; the surface
//! realizes anyway and draws what it can.

use log::{debug, info, warn};
use std::path::PathBuf;

use super::mesh::GeometryBuffer;
use super::shaders::{quad_shaders, LinkedProgram, ShaderProgramBuilder, ShaderSource};
use super::texture::{DecodedImage, Texture};
use crate::config::RenderConfig;
use crate::gpu::{ClearMask, GlApi, TextureHandle, NO_ERROR};
use crate::utils::error::{RenderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Unrealized,
    Realized,
}

/// What the event loop needs from a drawing surface.
pub trait RenderSurface {
    /// Allocates every GPU object. Must run with the context current.
    fn initialize(&mut self) -> Result<()>;
    /// Draws one frame; `false` when the surface is not realized.
    fn render(&mut self) -> bool;
    /// Frees every GPU object. Safe to call when already unrealized.
    fn release(&mut self);
    fn state(&self) -> SurfaceState;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSettings {
    pub texture_path: PathBuf,
    pub clear_color: [f32; 4],
    pub has_depth: bool,
}

impl From<&RenderConfig> for SurfaceSettings {
    fn from(config: &RenderConfig) -> Self {
        Self {
            texture_path: config.texture_path.clone(),
            clear_color: config.clear_color,
            has_depth: config.has_depth(),
        }
    }
}

impl SurfaceSettings {
    /// Overrides the depth flag with what the created framebuffer actually has.
    pub fn with_depth(mut self, has_depth: bool) -> Self {
        self.has_depth = has_depth;
        self
    }
}

#[derive(Debug)]
struct GpuResources {
    program: LinkedProgram,
    texture: Option<Texture>,
    geometry: GeometryBuffer,
}

pub struct RenderSurfaceController<G: GlApi> {
    gl: G,
    settings: SurfaceSettings,
    shaders: ShaderSource,
    builder: ShaderProgramBuilder,
    // Some exactly while realized
    resources: Option<GpuResources>,
}

impl<G: GlApi> RenderSurfaceController<G> {
    pub fn new(gl: G, settings: SurfaceSettings) -> Self {
        Self::with_shaders(gl, settings, quad_shaders::source())
    }

    pub fn with_shaders(gl: G, settings: SurfaceSettings, shaders: ShaderSource) -> Self {
        Self {
            gl,
            settings,
            shaders,
            builder: ShaderProgramBuilder::new(),
            resources: None,
        }
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    pub fn gl_mut(&mut self) -> &mut G {
        &mut self.gl
    }

    pub fn program(&self) -> Option<&LinkedProgram> {
        self.resources.as_ref().map(|r| &r.program)
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.resources.as_ref().and_then(|r| r.texture.as_ref())
    }

    pub fn geometry(&self) -> Option<&GeometryBuffer> {
        self.resources.as_ref().map(|r| &r.geometry)
    }

    /// Matches the viewport to a resized surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.resources.is_none() || width == 0 || height == 0 {
            return;
        }
        self.gl.viewport(width, height);
    }

    fn load_texture(&mut self) -> Option<Texture> {
        let path = &self.settings.texture_path;
        let image = match DecodedImage::load(path) {
            Ok(image) => image,
            Err(e) => {
                warn!("Failed to load texture {}: {}", path.display(), e);
                return None;
            }
        };
        info!(
            "Image loaded: {}x{}, {} channels",
            image.width(),
            image.height(),
            image.source_channels()
        );

        match Texture::upload(&mut self.gl, &image) {
            Ok(texture) => Some(texture),
            Err(e) => {
                warn!("Failed to upload texture {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl<G: GlApi> RenderSurface for RenderSurfaceController<G> {
    fn initialize(&mut self) -> Result<()> {
        if self.resources.is_some() {
            warn!("Render surface is already realized");
            return Ok(());
        }

        let error = self.gl.get_error();
        if error != NO_ERROR {
            warn!("Failed to initialize OpenGL context (error 0x{:04X})", error);
            return Err(RenderError::Context(error));
        }

        let texture = self.load_texture();
        let geometry = GeometryBuffer::upload(&mut self.gl);
        let program = self.builder.build_lenient(&mut self.gl, &self.shaders);
        if !program.linked() {
            warn!("No usable shader program, frames will stay blank");
        }

        self.resources = Some(GpuResources {
            program,
            texture,
            geometry,
        });
        debug!("Render surface realized");
        Ok(())
    }

    fn render(&mut self) -> bool {
        let Some(resources) = &self.resources else {
            return false;
        };

        self.gl.clear_color(self.settings.clear_color);
        self.gl.clear(ClearMask {
            color: true,
            depth: self.settings.has_depth,
        });

        if !resources.program.linked() {
            return true;
        }

        let texture = resources
            .texture
            .as_ref()
            .map_or(TextureHandle::INVALID, Texture::handle);

        self.gl.use_program(resources.program.handle());
        self.gl.bind_texture(texture);
        self.gl.bind_vertex_array(resources.geometry.vertex_array());
        self.gl.draw_triangles_u32(resources.geometry.index_count());
        true
    }

    fn release(&mut self) {
        let Some(resources) = self.resources.take() else {
            return;
        };

        resources.geometry.release(&mut self.gl);
        if let Some(texture) = resources.texture {
            texture.release(&mut self.gl);
        }
        let program = resources.program.handle();
        if program.is_valid() {
            self.gl.delete_program(program);
        }
        debug!("Render surface released");
    }

    fn state(&self) -> SurfaceState {
        if self.resources.is_some() {
            SurfaceState::Realized
        } else {
            SurfaceState::Unrealized
        }
    }
}

impl<G: GlApi> Drop for RenderSurfaceController<G> {
    fn drop(&mut self) {
        // The context may already be gone, so no GL calls here.
        if self.resources.is_some() {
            warn!("Render surface dropped without release(); GPU objects leaked");
        }
    }
}
