/// Dynamic uniform buffer holding one `T` per slot.
///
/// Per-draw data (object matrices, light parameters, wireframe colours) is
/// packed into a single buffer.  The stage binds it once and selects the
/// element with a dynamic offset:
///
/// ```text
/// rpass.set_bind_group(1, array.bind_group(), &[array.offset(i)]);
/// ```
///
/// ## Alignment
///
/// wgpu requires each dynamic offset to be a multiple of
/// `min_uniform_buffer_offset_alignment` (typically 256 bytes on desktop,
/// 64 on some mobile GPUs), so slots are `align_up(size_of::<T>(), alignment)`
/// bytes apart even though only `size_of::<T>()` bytes are read.
use std::marker::PhantomData;
use std::sync::Arc;

pub struct UniformArray<T: bytemuck::Pod> {
    label: &'static str,
    buffer: wgpu::Buffer,
    bind_group: Arc<wgpu::BindGroup>,
    /// Byte distance between consecutive slots.
    stride: u32,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformArray<T> {
    /// Size of one element as seen by the shader.
    pub const ELEMENT_SIZE: u64 = std::mem::size_of::<T>() as u64;

    /// `layout` must declare binding 0 as a uniform buffer with
    /// `has_dynamic_offset: true`.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &'static str,
        initial_capacity: usize,
    ) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let stride = align_up(Self::ELEMENT_SIZE as u32, alignment);

        let capacity = initial_capacity.max(1);
        let buffer = Self::create_buffer(device, label, capacity, stride);
        let bind_group = Self::create_bind_group(device, layout, label, &buffer);

        Self {
            label,
            buffer,
            bind_group: Arc::new(bind_group),
            stride,
            capacity,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Byte offset of slot `index`.
    #[inline]
    pub fn offset(&self, index: usize) -> u32 {
        (index as u32).wrapping_mul(self.stride)
    }

    /// Writes `value` into slot `index`.
    #[inline]
    pub fn write(&self, queue: &wgpu::Queue, index: usize, value: &T) {
        debug_assert!(index < self.capacity, "{} slot out of range", self.label);
        queue.write_buffer(&self.buffer, self.offset(index) as u64, bytemuck::bytes_of(value));
    }

    /// Ensures at least `needed` slots exist.
    ///
    /// Growing **reallocates** the buffer and its bind group (capacity doubles
    /// until sufficient), so call this before recording any draw that uses
    /// the array in the current frame.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout, needed: usize) {
        if needed <= self.capacity {
            return;
        }
        let mut new_cap = self.capacity;
        while new_cap < needed {
            new_cap *= 2;
        }
        log::debug!("{}: growing {} -> {} slots", self.label, self.capacity, new_cap);
        self.buffer = Self::create_buffer(device, self.label, new_cap, self.stride);
        self.bind_group = Arc::new(Self::create_bind_group(device, layout, self.label, &self.buffer));
        self.capacity = new_cap;
    }

    // ── Private helpers ──────────────────────────────────────────────────────

    fn create_buffer(device: &wgpu::Device, label: &str, capacity: usize, stride: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64 * stride as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    // The window the shader sees at each dynamic offset.
                    size: wgpu::BufferSize::new(Self::ELEMENT_SIZE),
                }),
            }],
        })
    }
}

/// Round `value` up to the next multiple of `alignment` (which must be a
/// power of two).
#[inline]
pub(crate) fn align_up(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::align_up;

    #[test]
    fn align_up_rounds_to_power_of_two() {
        assert_eq!(align_up(64, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(208, 64), 256);
    }
}
