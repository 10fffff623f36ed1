/// Flat grid in the XZ plane facing +Y, centred at the origin.
use crate::geometry::{Mesh, Vertex};

/// `(subdivisions + 1)²` vertices spanning `size × size` world units.
pub fn plane_data(size: f32, subdivisions: u32) -> (Vec<Vertex>, Vec<u32>) {
    let cells = subdivisions.max(1);
    let row = cells + 1;
    let step = size / cells as f32;
    let half = size * 0.5;

    let mut vertices = Vec::with_capacity((row * row) as usize);
    for z in 0..row {
        for x in 0..row {
            let px = -half + x as f32 * step;
            let pz = -half + z as f32 * step;
            let uv = [x as f32 / cells as f32, z as f32 / cells as f32];
            vertices.push(Vertex::new([px, 0.0, pz], [0.0, 1.0, 0.0], uv));
        }
    }

    let mut indices = Vec::with_capacity((cells * cells * 6) as usize);
    for z in 0..cells {
        for x in 0..cells {
            let i = z * row + x;
            // counter-clockwise seen from +Y
            indices.extend_from_slice(&[i, i + row, i + 1, i + 1, i + row, i + row + 1]);
        }
    }

    (vertices, indices)
}

pub fn plane(device: &wgpu::Device, size: f32, subdivisions: u32) -> Mesh {
    let (vertices, indices) = plane_data(size, subdivisions);
    Mesh::from_data_u32(device, "Plane", &vertices, &indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn grid_faces_up() {
        let (vertices, indices) = plane_data(10.0, 4);
        assert_eq!(vertices.len(), 25);
        assert_eq!(indices.len(), 4 * 4 * 6);
        for tri in indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(vertices[tri[k] as usize].position));
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }
}
