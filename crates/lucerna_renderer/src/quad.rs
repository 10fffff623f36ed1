//! The screen-space quad every light is drawn with.
//!
//! A [`ScreenQuad`] is four NDC vertices drawn as two triangles
//! (`0,1,2, 2,1,3`).  Full screen is `[-1,-1]..[1,1]`; the light stage shrinks
//! it to the footprint of one light volume so only covered pixels run the
//! lighting shader.
//!
//! Shrinking goes through [`QuadRegion`], which restores the full-screen
//! vertices when dropped, so no stage can leave the quad shrunk for the
//! next one.
//!
//! On the GPU side, every `Queue::write_buffer` issued during a frame lands
//! before that frame's commands execute, so one 4-vertex buffer cannot be
//! rewritten between draws.  [`QuadBuffer`] instead stores one quad per slot
//! (slot 0 is permanently full screen) and draws select a slot through
//! `base_vertex`.

use std::ops::Deref;

use bytemuck::{Pod, Zeroable};
use lucerna_core::ScreenRect;

use crate::resources::buffer;

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];
pub const VERTICES_PER_QUAD: u32 = 4;
/// Slot holding the untouched full-screen quad.
pub const FULLSCREEN_SLOT: u32 = 0;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

fn rect_vertices(rect: &ScreenRect) -> [QuadVertex; 4] {
    rect.vertices().map(|p| QuadVertex { position: p.to_array() })
}

// ─── CPU-side quad ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenQuad {
    vertices: [QuadVertex; 4],
}

impl Default for ScreenQuad {
    fn default() -> Self {
        Self::fullscreen()
    }
}

impl ScreenQuad {
    pub fn fullscreen() -> Self {
        Self {
            vertices: rect_vertices(&ScreenRect::FULLSCREEN),
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[QuadVertex; 4] {
        &self.vertices
    }

    pub fn is_fullscreen(&self) -> bool {
        self.vertices == rect_vertices(&ScreenRect::FULLSCREEN)
    }

    /// Overwrite the vertices with `rect`.  The caller uploads the result.
    pub fn shrink_to_light(&mut self, rect: ScreenRect) {
        self.vertices = rect_vertices(&rect);
    }

    pub fn reset_to_fullscreen(&mut self) {
        self.vertices = rect_vertices(&ScreenRect::FULLSCREEN);
    }

    /// Shrink to `rect` for the lifetime of the returned guard.
    pub fn region(&mut self, rect: ScreenRect) -> QuadRegion<'_> {
        self.shrink_to_light(rect);
        QuadRegion { quad: self }
    }
}

/// Scoped shrink of a [`ScreenQuad`]; restores full screen on drop.
pub struct QuadRegion<'a> {
    quad: &'a mut ScreenQuad,
}

impl Deref for QuadRegion<'_> {
    type Target = ScreenQuad;

    fn deref(&self) -> &ScreenQuad {
        self.quad
    }
}

impl Drop for QuadRegion<'_> {
    fn drop(&mut self) {
        self.quad.reset_to_fullscreen();
    }
}

// ─── GPU slots ─────────────────────────────────────────────────────────────

/// Vertex buffer of `capacity` quads plus the shared 6-entry index buffer.
pub struct QuadBuffer {
    vertex_buffer: wgpu::Buffer,
    index_buffer: std::sync::Arc<wgpu::Buffer>,
    capacity: u32,
}

impl QuadBuffer {
    pub fn new(device: &wgpu::Device, initial_capacity: u32) -> Self {
        let capacity = initial_capacity.max(1);
        Self {
            vertex_buffer: Self::create_vertex_buffer(device, capacity),
            index_buffer: buffer::create_index(device, "Screen Quad IB", &QUAD_INDICES),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    #[inline]
    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    /// First vertex of `slot`, for `draw_indexed(.., base_vertex, ..)`.
    #[inline]
    pub fn base_vertex(slot: u32) -> i32 {
        (slot * VERTICES_PER_QUAD) as i32
    }

    /// Grow to at least `needed` slots; contents of other slots are lost and
    /// must be re-uploaded this frame.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, needed: u32) {
        if needed <= self.capacity {
            return;
        }
        let mut new_cap = self.capacity;
        while new_cap < needed {
            new_cap *= 2;
        }
        self.vertex_buffer = Self::create_vertex_buffer(device, new_cap);
        self.capacity = new_cap;
    }

    /// Upload `quad` into `slot`.  Slot 0 is reserved for full screen.
    pub fn upload(&self, queue: &wgpu::Queue, slot: u32, quad: &ScreenQuad) {
        debug_assert!(slot != FULLSCREEN_SLOT, "slot 0 is the fixed full-screen quad");
        debug_assert!(slot < self.capacity, "quad slot out of range");
        let offset = (slot * VERTICES_PER_QUAD) as u64 * std::mem::size_of::<QuadVertex>() as u64;
        queue.write_buffer(&self.vertex_buffer, offset, bytemuck::cast_slice(quad.vertices()));
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
        // every slot starts out full screen
        let fullscreen = ScreenQuad::fullscreen();
        let data: Vec<QuadVertex> = (0..capacity).flat_map(|_| *fullscreen.vertices()).collect();
        buffer::create_dynamic_vertex(device, "Screen Quad VB", &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn shrink_then_reset_restores_fullscreen() {
        let mut quad = ScreenQuad::fullscreen();
        let original = quad.clone();
        quad.shrink_to_light(ScreenRect::new(Vec2::new(-0.2, -0.3), Vec2::new(0.4, 0.5)));
        assert!(!quad.is_fullscreen());
        assert_eq!(quad.vertices()[0].position, [-0.2, -0.3]);
        assert_eq!(quad.vertices()[3].position, [0.4, 0.5]);
        quad.reset_to_fullscreen();
        assert_eq!(quad, original);
    }

    #[test]
    fn region_guard_restores_on_drop() {
        let mut quad = ScreenQuad::fullscreen();
        {
            let region = quad.region(ScreenRect::new(Vec2::ZERO, Vec2::ONE));
            assert_eq!(region.vertices()[1].position, [1.0, 0.0]);
            assert!(!region.is_fullscreen());
        }
        assert!(quad.is_fullscreen());
    }

    #[test]
    fn triangles_wind_counter_clockwise() {
        let quad = ScreenQuad::fullscreen();
        for tri in QUAD_INDICES.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec2::from(quad.vertices()[tri[k] as usize].position));
            assert!((b - a).perp_dot(c - a) > 0.0);
        }
    }
}
