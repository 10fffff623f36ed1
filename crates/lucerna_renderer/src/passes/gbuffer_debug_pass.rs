/// Draws the raw G-buffer channels (colour, normal, depth) side by side
/// across the bottom quarter of the output.  Runs only on frames where
/// [`crate::Renderer::debug_blit_gbuffer`] was requested.
use wgpu::{
    CommandEncoder, Device, LoadOp, Operations, Queue, RenderPassColorAttachment, RenderPassDescriptor,
    StoreOp,
};

use crate::graph::{FramePacket, FrameTargets, RenderStage, Viewport};
use crate::pipeline::blit::GBufferChannel;
use crate::pipeline::{BlitPipelines, PipelineLayouts};

/// Pixel rectangle of one debug tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Tiles of `width/3 × height/4`, left to right, along the bottom edge.
/// Empty when the output is too small to hold them.
pub fn debug_tiles(viewport: Viewport) -> Vec<Tile> {
    let (width, height) = (viewport.width / 3, viewport.height / 4);
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let y = viewport.height - height;
    (0..3).map(|i| Tile { x: i * width, y, width, height }).collect()
}

pub struct GBufferDebugStage {
    pipelines: BlitPipelines,
}

impl GBufferDebugStage {
    pub fn new(device: &Device, layouts: &PipelineLayouts, output_format: wgpu::TextureFormat) -> Self {
        Self {
            pipelines: BlitPipelines::new(device, layouts, output_format),
        }
    }
}

impl RenderStage for GBufferDebugStage {
    fn name(&self) -> &str {
        "G-Buffer Debug Pass"
    }

    fn prepare(&mut self, _device: &Device, _queue: &Queue, _packet: &FramePacket) {}

    fn execute(&mut self, encoder: &mut CommandEncoder, targets: &FrameTargets<'_>, packet: &FramePacket) {
        if !packet.show_gbuffer {
            return;
        }
        let tiles = debug_tiles(packet.viewport);
        if tiles.is_empty() {
            return;
        }

        let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some(self.name()),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: targets.output,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Load,
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        rpass.set_bind_group(0, targets.gbuffer.bind_group(), &[]);
        for (channel, tile) in GBufferChannel::ALL.into_iter().zip(tiles) {
            rpass.set_viewport(
                tile.x as f32,
                tile.y as f32,
                tile.width as f32,
                tile.height as f32,
                0.0,
                1.0,
            );
            rpass.set_pipeline(self.pipelines.get(channel));
            rpass.draw(0..3, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_fill_bottom_quarter() {
        let tiles = debug_tiles(Viewport { width: 1200, height: 800 });
        assert_eq!(tiles.len(), 3);
        for (i, t) in tiles.iter().enumerate() {
            assert_eq!((t.width, t.height), (400, 200));
            assert_eq!(t.x, i as u32 * 400);
            assert_eq!(t.y + t.height, 800);
        }
    }

    #[test]
    fn tiny_output_has_no_tiles() {
        assert!(debug_tiles(Viewport { width: 2, height: 100 }).is_empty());
        assert!(debug_tiles(Viewport { width: 100, height: 3 }).is_empty());
    }
}
