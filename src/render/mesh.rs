use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use std::mem::{offset_of, size_of};

use crate::gpu::{BufferHandle, BufferTarget, GlApi, VertexArrayHandle, VertexAttribute};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

pub const VERTEX_STRIDE: usize = size_of::<QuadVertex>();

pub const POSITION_ATTRIBUTE: VertexAttribute = VertexAttribute {
    location: 0,
    components: 2,
    offset: offset_of!(QuadVertex, position),
};

pub const TEX_COORD_ATTRIBUTE: VertexAttribute = VertexAttribute {
    location: 1,
    components: 2,
    offset: offset_of!(QuadVertex, tex_coord),
};

/// Covers all of normalized device space; counter-clockwise from bottom-left.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex {
        position: [-1.0, -1.0],
        tex_coord: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, -1.0],
        tex_coord: [1.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        tex_coord: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0],
        tex_coord: [0.0, 1.0],
    },
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// CPU reference of [`quad_shaders::VERTEX_SRC`](super::shaders::quad_shaders::VERTEX_SRC).
///
/// Returns the clip-space position and the interpolated texture coordinate
/// for one vertex: the position passes through unchanged and `v` is flipped.
/// Useful for hit-testing or picking against the quad without reading back
/// from the GPU, and for checking a rasterized frame against the expected
/// mapping.
pub fn vertex_stage(vertex: &QuadVertex) -> (Vec4, Vec2) {
    let [x, y] = vertex.position;
    let [u, v] = vertex.tex_coord;
    (Vec4::new(x, y, 0.0, 1.0), Vec2::new(u, 1.0 - v))
}

/// The quad's vertex array and the two buffers it references.
#[derive(Debug, PartialEq, Eq)]
pub struct GeometryBuffer {
    vao: VertexArrayHandle,
    vbo: BufferHandle,
    ebo: BufferHandle,
}

impl GeometryBuffer {
    /// Uploads the quad and records its layout in a fresh vertex array.
    /// The vertex array stays bound afterwards.
    pub fn upload(gl: &mut impl GlApi) -> Self {
        let vao = gl.create_vertex_array();
        let vbo = gl.create_buffer();
        let ebo = gl.create_buffer();

        gl.bind_vertex_array(vao);

        gl.bind_buffer(BufferTarget::Array, vbo);
        gl.buffer_data(BufferTarget::Array, bytemuck::cast_slice(&QUAD_VERTICES));

        gl.bind_buffer(BufferTarget::ElementArray, ebo);
        gl.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(&QUAD_INDICES));

        for attribute in [POSITION_ATTRIBUTE, TEX_COORD_ATTRIBUTE] {
            gl.vertex_attrib_pointer(attribute, VERTEX_STRIDE);
            gl.enable_vertex_attrib_array(attribute.location);
        }

        Self { vao, vbo, ebo }
    }

    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vao
    }

    pub fn vertex_buffer(&self) -> BufferHandle {
        self.vbo
    }

    pub fn index_buffer(&self) -> BufferHandle {
        self.ebo
    }

    pub fn index_count(&self) -> usize {
        QUAD_INDICES.len()
    }

    pub fn release(self, gl: &mut impl GlApi) {
        gl.delete_buffer(self.vbo);
        gl.delete_buffer(self.ebo);
        gl.delete_vertex_array(self.vao);
    }
}
