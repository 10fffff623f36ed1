/// A drawable GPU mesh: vertex/index buffers, the index count and the
/// object-space bounds used to fit colliders.
///
/// Meshes are cheaply cloneable because the underlying buffers are `Arc`-
/// wrapped.  Cloning a mesh does **not** copy GPU memory.
use std::sync::Arc;

use glam::Vec3;

use crate::geometry::Vertex;
use crate::resources::buffer;

#[derive(Clone)]
pub struct Mesh {
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub index_buffer: Arc<wgpu::Buffer>,
    pub index_count: u32,
    pub index_format: wgpu::IndexFormat,
    /// Object-space minimum corner.
    pub bottom_left: Vec3,
    /// Object-space maximum corner.
    pub top_right: Vec3,
}

impl Mesh {
    /// Uploads `vertices` and 16-bit `indices` and records their bounds.
    pub fn from_data(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u16]) -> Self {
        let (bottom_left, top_right) = bounds_of(vertices);
        Self {
            vertex_buffer: buffer::create_vertex(device, &format!("{label} VB"), vertices),
            index_buffer: buffer::create_index(device, &format!("{label} IB"), indices),
            index_count: indices.len() as u32,
            index_format: wgpu::IndexFormat::Uint16,
            bottom_left,
            top_right,
        }
    }

    /// 32-bit index variant for meshes with more than 65 536 vertices
    /// (terrain grids).
    pub fn from_data_u32(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let (bottom_left, top_right) = bounds_of(vertices);
        Self {
            vertex_buffer: buffer::create_vertex(device, &format!("{label} VB"), vertices),
            index_buffer: buffer::create_index(device, &format!("{label} IB"), indices),
            index_count: indices.len() as u32,
            index_format: wgpu::IndexFormat::Uint32,
            bottom_left,
            top_right,
        }
    }

    /// Unit cube centred at the origin.
    pub fn cube(device: &wgpu::Device) -> Self {
        super::primitives::cube(device)
    }
}

/// Componentwise min/max of all vertex positions; zero for an empty slice.
pub fn bounds_of(vertices: &[Vertex]) -> (Vec3, Vec3) {
    let mut it = vertices.iter().map(|v| Vec3::from(v.position));
    match it.next() {
        Some(first) => it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))),
        None => (Vec3::ZERO, Vec3::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_vertices() {
        let v = |p: [f32; 3]| Vertex::new(p, [0.0, 1.0, 0.0], [0.0, 0.0]);
        let (lo, hi) = bounds_of(&[v([1.0, -2.0, 0.5]), v([-1.0, 3.0, 0.0]), v([0.0, 0.0, -4.0])]);
        assert_eq!(lo, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(hi, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn empty_mesh_has_zero_bounds() {
        assert_eq!(bounds_of(&[]), (Vec3::ZERO, Vec3::ZERO));
    }
}
