/// The `RenderStage` trait: every step of the deferred frame implements it.
///
/// ## Two-phase design
/// `prepare` → `execute` lets stages upload GPU data **before** the encoder
/// records their render pass.  Uniform writes go through
/// `Queue::write_buffer`, which must not be interleaved with an open pass.
use wgpu::{CommandEncoder, Device, Queue, TextureView};

use crate::graph::FramePacket;
use crate::render_target::GBuffer;
use crate::scene::Backdrop;

/// Attachments shared by the stages of one frame.
pub struct FrameTargets<'a> {
    /// The frame being presented (usually a swapchain view).
    pub output: &'a TextureView,
    pub gbuffer: &'a GBuffer,
    /// Drawn by the forward stage before the wireframes.
    pub backdrop: Option<&'a dyn Backdrop>,
}

pub trait RenderStage {
    /// Short label used for the wgpu render pass.
    fn name(&self) -> &str;

    /// Upload per-frame data.  Called before `execute` each frame.
    fn prepare(&mut self, device: &Device, queue: &Queue, packet: &FramePacket);

    /// Record this stage's render pass into `encoder`.
    fn execute(&mut self, encoder: &mut CommandEncoder, targets: &FrameTargets<'_>, packet: &FramePacket);
}
