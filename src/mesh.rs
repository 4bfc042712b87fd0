use wgpu::util::{BufferInitDescriptor, DeviceExt};

use crate::context::RenderContext;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
    };
}

/// Unit square, wound as a triangle fan around the origin.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex { position: [0.0, 0.0] },
    Vertex { position: [1.0, 0.0] },
    Vertex { position: [1.0, 1.0] },
    Vertex { position: [0.0, 1.0] },
];

/// Triangle-list indices for a fan of `vertex_count` vertices.
pub fn fan_indices(vertex_count: u16) -> Vec<u16> {
    (2..vertex_count).flat_map(|i| [0, i - 1, i]).collect()
}

pub struct QuadMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl QuadMesh {
    pub fn upload(render_ctx: &RenderContext) -> Self {
        let (device, ..) = render_ctx.get_device();
        let indices = fan_indices(QUAD_VERTICES.len() as u16);

        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("quad vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("quad fan indices"),
            contents: bytemuck::cast_slice(indices.as_slice()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_fan_is_two_triangles_sharing_first_vertex() {
        assert_eq!(fan_indices(4), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn degenerate_fans_are_empty() {
        assert!(fan_indices(0).is_empty());
        assert!(fan_indices(1).is_empty());
        assert!(fan_indices(2).is_empty());
        assert_eq!(fan_indices(3), vec![0, 1, 2]);
    }

    #[test]
    fn fan_indices_stay_in_range() {
        let indices = fan_indices(9);
        assert_eq!(indices.len(), 7 * 3);
        assert!(indices.iter().all(|&i| i < 9));
        assert!(indices.chunks(3).all(|tri| tri[0] == 0));
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(Vertex::LAYOUT.array_stride, 8);
        assert_eq!(Vertex::LAYOUT.attributes.len(), 1);

        let attr = Vertex::LAYOUT.attributes[0];
        assert_eq!(attr.shader_location, 0);
        assert_eq!(attr.offset, 0);
        assert_eq!(attr.format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn quad_covers_unit_square() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 32);

        let (min, max) = QUAD_VERTICES.iter().fold(
            ([f32::MAX; 2], [f32::MIN; 2]),
            |(min, max), v| {
                (
                    [min[0].min(v.position[0]), min[1].min(v.position[1])],
                    [max[0].max(v.position[0]), max[1].max(v.position[1])],
                )
            },
        );
        assert_eq!(min, [0.0, 0.0]);
        assert_eq!(max, [1.0, 1.0]);
    }
}
