/// Unit cube primitives centred at the origin (`±0.5`), matching the local
/// box of a [`lucerna_core::BoundingVolume`] so a collider's model matrix
/// draws its wireframe directly.
use glam::Vec3;

use crate::geometry::{Mesh, Vertex};
use crate::resources::buffer;

/// Outward normal plus two in-face axes with `u × v = normal`, so the
/// quad `(-u-v, u-v, u+v, -u+v)` winds counter-clockwise seen from outside.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// 24 vertices (4 per face, flat normals) and 36 indices.
pub fn cube_data() -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, &(n, u, v)) in FACES.iter().enumerate() {
        let centre = n * 0.5;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (su, sv) in corners {
            let p = centre + (u * su + v * sv) * 0.5;
            let uv = [(su + 1.0) * 0.5, 1.0 - (sv + 1.0) * 0.5];
            vertices.push(Vertex::new(p.to_array(), n.to_array(), uv));
        }
        let base = (face * 4) as u16;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

pub fn cube(device: &wgpu::Device) -> Mesh {
    let (vertices, indices) = cube_data();
    Mesh::from_data(device, "Cube", &vertices, &indices)
}

/// 8 corners and 12 edges as a line list (24 indices).
pub fn wire_cube_data() -> (Vec<Vertex>, Vec<u16>) {
    // corner index bits: 1 = +x, 2 = +y, 4 = +z
    let vertices = (0..8)
        .map(|i| {
            let p = [
                if i & 1 == 0 { -0.5 } else { 0.5 },
                if i & 2 == 0 { -0.5 } else { 0.5 },
                if i & 4 == 0 { -0.5 } else { 0.5 },
            ];
            Vertex::new(p, [0.0; 3], [0.0; 2])
        })
        .collect();

    #[rustfmt::skip]
    let indices = vec![
        0, 1,  2, 3,  4, 5,  6, 7, // x edges
        0, 2,  1, 3,  4, 6,  5, 7, // y edges
        0, 4,  1, 5,  2, 6,  3, 7, // z edges
    ];

    (vertices, indices)
}

pub fn wire_cube(device: &wgpu::Device) -> Mesh {
    let (vertices, indices) = wire_cube_data();
    let vertex_buffer = buffer::create_vertex(device, "Wire Cube VB", &vertices);
    let index_buffer = buffer::create_index(device, "Wire Cube IB", &indices);
    Mesh {
        vertex_buffer,
        index_buffer,
        index_count: indices.len() as u32,
        index_format: wgpu::IndexFormat::Uint16,
        bottom_left: Vec3::splat(-0.5),
        top_right: Vec3::splat(0.5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_wind_counter_clockwise_outwards() {
        let (vertices, indices) = cube_data();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for tri in indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(vertices[tri[k] as usize].position));
            let n = Vec3::from(vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn wire_edges_are_axis_aligned_and_unit_length() {
        let (vertices, indices) = wire_cube_data();
        for edge in indices.chunks(2) {
            let a = Vec3::from(vertices[edge[0] as usize].position);
            let b = Vec3::from(vertices[edge[1] as usize].position);
            assert!(((b - a).length() - 1.0).abs() < 1e-6);
        }
    }
}
