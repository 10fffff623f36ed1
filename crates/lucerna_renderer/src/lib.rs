/// `lucerna_renderer`: deferred wgpu renderer with light-volume culling.
///
/// # Module layout
///
/// | Module          | Responsibility                                          |
/// |-----------------|---------------------------------------------------------|
/// | `context`       | `EngineContext`: instance, adapter, device, queue       |
/// | `resources`     | Buffer/texture helpers, uniform arrays, the registry    |
/// | `geometry`      | `Vertex`, `Mesh`, built-in primitives                   |
/// | `pipeline`      | Bind-group layouts, pipelines, uniform blocks           |
/// | `render_target` | The G-buffer                                            |
/// | `quad`          | Screen-space light quad and its GPU slots               |
/// | `scene`         | Drawables, backdrop, light culling                      |
/// | `graph`         | `RenderStage` trait + `FramePacket`                     |
/// | `passes`        | Geometry, light, forward and G-buffer debug stages      |
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod passes;
pub mod pipeline;
pub mod quad;
pub mod render_target;
pub mod resources;
pub mod scene;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use glam;
pub use lucerna_core;
pub use wgpu;

pub use config::RendererConfig;
pub use context::{ContextError, EngineContext};
pub use error::RendererError;
pub use geometry::{Mesh, Vertex};
pub use graph::{FramePacket, RenderStage};
pub use render_target::GBuffer;
pub use resources::{Material, MaterialDesc, MaterialHandle, MeshHandle, ResourceRegistry, TextureHandle};
pub use scene::{Backdrop, CullStats, DrawList, GradientSkybox, MeshDrawable, SceneContents, TerrainSource};

// ── Internal imports ──────────────────────────────────────────────────────────

use std::collections::HashSet;

use glam::Mat4;
use lucerna_core::{Camera, Color, DirectionalLight, HasBoundingVolume, LightKind, PointLight, ScreenRect, SpotLight};

use graph::{CameraPacket, FrameTargets, GeometryDraw, LightDraw, Viewport, WireDraw};
use passes::{ForwardStage, GBufferDebugStage, GeometryStage, LightStage};
use pipeline::uniforms::GpuLight;
use pipeline::PipelineLayouts;

const COLLIDER_COLOR: Color = Color::RED;
const SELECTED_COLLIDER_COLOR: Color = Color::YELLOW;
const LIGHT_VOLUME_COLOR: Color = Color::BLUE;

/// A handle that failed to resolve at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MissingHandle {
    Mesh(MeshHandle),
    Material(MaterialHandle),
}

/// What one call to [`Renderer::render_frame`] drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub geometry_draws: usize,
    pub skipped_draws: usize,
    pub directional_lights: usize,
    pub wireframes: usize,
    pub cull: CullStats,
}

/// Debug requests waiting for the next frame.
#[derive(Default)]
struct DebugQueue {
    wires: Vec<WireDraw>,
    show_gbuffer: bool,
}

/// Top-level renderer.
///
/// Each frame runs the stage list (geometry → light accumulation →
/// forward overlay → G-buffer debug) with the two-phase
/// **prepare → execute** pattern.  The renderer owns the G-buffer; meshes,
/// textures and materials live in a [`ResourceRegistry`] the caller owns and
/// passes in.
pub struct Renderer {
    pub context: EngineContext,
    config: RendererConfig,
    layouts: PipelineLayouts,
    gbuffer: GBuffer,
    /// Ordered list of stages executed every frame.
    stages: Vec<Box<dyn RenderStage>>,
    backdrop: Option<Box<dyn Backdrop>>,

    pending_resize: Option<(u32, u32)>,
    debug: DebugQueue,
    warned: HashSet<MissingHandle>,

    output_format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Builds the G-buffer, every pipeline and the built-in stages.
    ///
    /// Pipeline or G-buffer validation failures abort the process.
    pub fn new(
        context: EngineContext,
        width: u32,
        height: u32,
        output_format: wgpu::TextureFormat,
        config: RendererConfig,
    ) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let device = &context.device;

        let layouts = PipelineLayouts::new(device);
        let gbuffer = pipeline::validate::validated(device, "G-Buffer", || {
            GBuffer::new(device, layouts.gbuffer.clone(), width, height)
        });

        let stages: Vec<Box<dyn RenderStage>> = vec![
            Box::new(GeometryStage::new(device, &layouts, config.initial_object_capacity)),
            Box::new(LightStage::new(device, &layouts, output_format, config.initial_light_capacity)),
            Box::new(ForwardStage::new(device, &layouts, output_format)),
            Box::new(GBufferDebugStage::new(device, &layouts, output_format)),
        ];

        log::debug!("renderer ready at {width}x{height}, output {output_format:?}");

        Self {
            context,
            config,
            layouts,
            gbuffer,
            stages,
            backdrop: None,
            pending_resize: None,
            debug: DebugQueue::default(),
            warned: HashSet::new(),
            output_format,
            width,
            height,
        }
    }

    /// A registry whose materials bind against this renderer's geometry
    /// pipeline.
    pub fn new_registry(&self) -> ResourceRegistry {
        ResourceRegistry::new(
            self.context.device.clone(),
            self.context.queue.clone(),
            self.layouts.material.clone(),
        )
    }

    /// Gradient sky built against this renderer's layouts and output format.
    pub fn create_gradient_skybox(&self, zenith: Color, horizon: Color, ground: Color) -> GradientSkybox {
        GradientSkybox::new(
            &self.context.device,
            &self.layouts,
            self.output_format,
            zenith,
            horizon,
            ground,
        )
    }

    pub fn set_backdrop(&mut self, backdrop: Option<Box<dyn Backdrop>>) {
        self.backdrop = backdrop;
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn gbuffer(&self) -> &GBuffer {
        &self.gbuffer
    }

    #[inline]
    pub fn output_format(&self) -> wgpu::TextureFormat {
        self.output_format
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    // ── Resize ────────────────────────────────────────────────────────────────

    /// Queues a G-buffer rebuild for the start of the next frame.
    /// Zero-sized requests (minimised window) are ignored.
    pub fn on_resize_window(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.pending_resize = Some((width, height));
    }

    fn apply_pending_resize(&mut self) {
        let Some((width, height)) = self.pending_resize.take() else {
            return;
        };
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.gbuffer.resize(&self.context.device, width, height);
        self.width = width;
        self.height = height;
    }

    // ── Debug requests ────────────────────────────────────────────────────────

    /// Queues wireframes for `colliders` (red; yellow for `selected`).
    pub fn debug_draw_colliders<V: HasBoundingVolume>(
        &mut self,
        camera: &Camera,
        colliders: &[V],
        selected: Option<usize>,
    ) {
        let view_proj = camera.view_projection();
        for (i, collider) in colliders.iter().enumerate() {
            let color = if selected == Some(i) {
                SELECTED_COLLIDER_COLOR
            } else {
                COLLIDER_COLOR
            };
            self.queue_wire(view_proj, collider.bounding_volume().model(), color);
        }
    }

    /// Queues blue wireframes for the volumes of point and spot lights.
    pub fn debug_draw_light_volumes(&mut self, camera: &Camera, points: &[PointLight], spots: &[SpotLight]) {
        let view_proj = camera.view_projection();
        for volume in points
            .iter()
            .map(HasBoundingVolume::bounding_volume)
            .chain(spots.iter().map(HasBoundingVolume::bounding_volume))
        {
            self.queue_wire(view_proj, volume.model(), LIGHT_VOLUME_COLOR);
        }
    }

    /// Shows the G-buffer channels in the bottom quarter of the next frame.
    pub fn debug_blit_gbuffer(&mut self) {
        self.debug.show_gbuffer = true;
    }

    fn queue_wire(&mut self, view_proj: Mat4, model: Mat4, color: Color) {
        self.debug.wires.push(WireDraw {
            mvp: view_proj * model,
            color,
        });
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Allocates a fresh `CommandEncoder` for the current frame.
    pub fn begin_frame(&self) -> wgpu::CommandEncoder {
        self.context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            })
    }

    /// Renders one frame into `target`.
    ///
    /// The light lists in `scene` are reordered in place so the visible
    /// lights come first; only that prefix is drawn.
    pub fn render_frame(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        registry: &ResourceRegistry,
        camera: &Camera,
        scene: SceneContents<'_>,
    ) -> FrameStats {
        self.apply_pending_resize();

        let view = camera.view();
        let projection = camera.projection();
        let camera_packet = CameraPacket::new(view, projection, camera.position());

        let mut stats = FrameStats::default();

        // 1. Light visibility
        let eye = camera_packet.eye;
        let point_visible = scene::cull(eye, view, projection, scene.point_lights);
        let spot_visible = scene::cull(eye, view, projection, scene.spot_lights);
        stats.cull = CullStats {
            point_visible,
            point_total: scene.point_lights.len(),
            spot_visible,
            spot_total: scene.spot_lights.len(),
        };
        log::trace!(
            "visible lights: {point_visible}/{} point, {spot_visible}/{} spot",
            stats.cull.point_total,
            stats.cull.spot_total,
        );

        // 2. Geometry, with terrain through the same drawable contract
        let mut terrain = DrawList::new();
        if let Some(source) = scene.terrain {
            source.render(projection, view, &mut terrain);
        }
        let mut geometry = Vec::with_capacity(scene.drawables.len() + terrain.len());
        for drawable in scene.drawables.iter().chain(terrain.as_slice()) {
            match self.resolve(registry, drawable) {
                Some(draw) => geometry.push(draw),
                None => stats.skipped_draws += 1,
            }
        }
        stats.geometry_draws = geometry.len();

        // 3. Lights in draw order
        let lights = light_draws(
            &camera_packet,
            self.config.shrink_light_quads,
            &scene.point_lights[..point_visible],
            &scene.spot_lights[..spot_visible],
            scene.directional_lights,
        );
        stats.directional_lights = scene.directional_lights.len();

        let debug = std::mem::take(&mut self.debug);
        stats.wireframes = debug.wires.len();

        let packet = FramePacket {
            viewport: Viewport {
                width: self.width,
                height: self.height,
            },
            camera: camera_packet,
            geometry,
            lights,
            wires: debug.wires,
            show_gbuffer: debug.show_gbuffer,
            clear_color: self.config.clear_color.to_wgpu(),
        };

        // 4. Backdrop uploads happen before any pass is recorded
        if let Some(backdrop) = self.backdrop.as_mut() {
            backdrop.prepare(&self.context.queue, projection, view);
        }

        let targets = FrameTargets {
            output: target,
            gbuffer: &self.gbuffer,
            backdrop: self.backdrop.as_deref(),
        };

        // 5. Every stage
        for stage in &mut self.stages {
            stage.prepare(&self.context.device, &self.context.queue, &packet);
            stage.execute(encoder, &targets, &packet);
        }

        stats
    }

    fn resolve(&mut self, registry: &ResourceRegistry, drawable: &MeshDrawable) -> Option<GeometryDraw> {
        let Some(mesh) = registry.mesh(drawable.mesh) else {
            self.warn_once(MissingHandle::Mesh(drawable.mesh));
            return None;
        };
        let Some(material) = registry.material(drawable.material) else {
            self.warn_once(MissingHandle::Material(drawable.material));
            return None;
        };
        Some(GeometryDraw {
            mesh: mesh.clone(),
            material: material.bind_group.clone(),
            model: drawable.model,
        })
    }

    fn warn_once(&mut self, handle: MissingHandle) {
        if self.warned.insert(handle) {
            log::warn!("skipping draw: {handle:?} does not resolve");
        }
    }
}

/// Visible lights in draw order: points, then spots, then directionals.
///
/// Point and spot quads are shrunk to their clamped footprint when `shrink`
/// is set; directional lights always cover the whole screen.
fn light_draws(
    camera: &CameraPacket,
    shrink: bool,
    points: &[PointLight],
    spots: &[SpotLight],
    directionals: &[DirectionalLight],
) -> Vec<LightDraw> {
    let rect_of = |volume: &lucerna_core::BoundingVolume| {
        if shrink {
            scene::footprint(camera.eye, camera.view_proj, volume).quad_rect()
        } else {
            ScreenRect::FULLSCREEN
        }
    };

    let mut draws = Vec::with_capacity(points.len() + spots.len() + directionals.len());
    draws.extend(points.iter().map(|l| LightDraw {
        kind: LightKind::Point,
        params: GpuLight::from(l),
        rect: rect_of(l.bounding_volume()),
    }));
    draws.extend(spots.iter().map(|l| LightDraw {
        kind: LightKind::Spot,
        params: GpuLight::from(l),
        rect: rect_of(l.bounding_volume()),
    }));
    draws.extend(directionals.iter().map(|l| LightDraw {
        kind: LightKind::Directional,
        params: GpuLight::from(l),
        rect: ScreenRect::FULLSCREEN,
    }));
    draws
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn headless() -> Option<EngineContext> {
        pollster::block_on(EngineContext::new()).ok()
    }

    fn offscreen(renderer: &Renderer) -> wgpu::Texture {
        let (width, height) = renderer.size();
        renderer.context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Test Output"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: renderer.output_format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    fn looking_down_z() -> CameraPacket {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        CameraPacket::new(camera.view(), camera.projection(), camera.position())
    }

    #[test]
    fn lights_are_drawn_points_then_spots_then_directionals() {
        let camera = looking_down_z();
        let points = [PointLight::new(Vec3::new(1.0, 0.0, -200.0)), PointLight::new(Vec3::new(0.0, 0.0, 10.0))];
        let spots = [SpotLight::new(Vec3::new(-1.0, 1.0, -250.0), Vec3::NEG_Y)];
        let directionals = [DirectionalLight::default()];

        let draws = light_draws(&camera, true, &points, &spots, &directionals);
        let kinds: Vec<LightKind> = draws.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            [LightKind::Point, LightKind::Point, LightKind::Spot, LightKind::Directional]
        );

        // a distant light is shrunk, the one around the eye is not
        assert_ne!(draws[0].rect, ScreenRect::FULLSCREEN);
        assert!(draws[0].rect.min.x >= -1.0 && draws[0].rect.max.x <= 1.0);
        assert_eq!(draws[1].rect, ScreenRect::FULLSCREEN);
        assert_ne!(draws[2].rect, ScreenRect::FULLSCREEN);
        assert_eq!(draws[3].rect, ScreenRect::FULLSCREEN);
    }

    #[test]
    fn disabled_shrinking_gives_every_light_the_full_screen() {
        let camera = looking_down_z();
        let points = [PointLight::new(Vec3::new(1.0, 0.0, -200.0))];
        let spots = [SpotLight::new(Vec3::new(-1.0, 1.0, -250.0), Vec3::NEG_Y)];
        let draws = light_draws(&camera, false, &points, &spots, &[]);
        assert_eq!(draws.len(), 2);
        assert!(draws.iter().all(|d| d.rect == ScreenRect::FULLSCREEN));
    }

    #[test]
    fn frame_culls_lights_and_skips_missing_handles() {
        let Some(ctx) = headless() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };
        let mut renderer = Renderer::new(
            ctx,
            320,
            240,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            RendererConfig::default(),
        );
        let mut registry = renderer.new_registry();
        let (vertices, indices) = geometry::primitives::cube_data();
        let cube = registry.create_mesh("cube", &vertices, &indices);
        let material = registry
            .create_material(MaterialDesc::default())
            .expect("default material");
        let gone = registry.create_mesh("gone", &vertices, &indices);
        registry.remove_mesh(gone);
        let retired = registry
            .create_material(MaterialDesc::default())
            .expect("second material");
        assert!(registry.remove_material(retired).is_some());

        let drawables = [
            MeshDrawable {
                model: Mat4::IDENTITY,
                mesh: cube,
                material,
            },
            MeshDrawable {
                model: Mat4::IDENTITY,
                mesh: gone,
                material,
            },
            MeshDrawable {
                model: Mat4::IDENTITY,
                mesh: cube,
                material: retired,
            },
        ];
        let mut points = vec![
            PointLight::new(Vec3::new(100.0, 0.0, 0.0)),
            PointLight::new(Vec3::ZERO),
            PointLight::new(Vec3::new(-100.0, 0.0, 0.0)),
        ];
        let mut spots: Vec<SpotLight> = Vec::new();

        let mut camera = Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        camera.set_aspect(320, 240);
        renderer.debug_draw_light_volumes(&camera, &points, &spots);
        renderer.debug_blit_gbuffer();

        let output = offscreen(&renderer);
        let view = output.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = renderer.begin_frame();
        let stats = renderer.render_frame(
            &mut encoder,
            &view,
            &registry,
            &camera,
            SceneContents {
                drawables: &drawables,
                terrain: None,
                point_lights: &mut points,
                spot_lights: &mut spots,
                directional_lights: &[lucerna_core::DirectionalLight::default()],
            },
        );
        renderer.context.queue.submit(Some(encoder.finish()));

        assert_eq!(stats.cull.point_visible, 1);
        assert_eq!(points[0].position(), Vec3::ZERO);
        assert_eq!(stats.geometry_draws, 1);
        assert_eq!(stats.skipped_draws, 2);
        assert!(renderer.warned.contains(&MissingHandle::Mesh(gone)));
        assert!(renderer.warned.contains(&MissingHandle::Material(retired)));
        assert_eq!(stats.wireframes, 3);

        // debug requests are consumed by the frame
        assert!(renderer.debug.wires.is_empty());
        assert!(!renderer.debug.show_gbuffer);
    }

    #[test]
    fn resize_is_deferred_to_next_frame() {
        let Some(ctx) = headless() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };
        let mut renderer = Renderer::new(
            ctx,
            64,
            64,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            RendererConfig::default(),
        );
        let registry = renderer.new_registry();
        renderer.on_resize_window(128, 96);
        assert_eq!(renderer.gbuffer().width(), 64);

        // a minimised window does not cancel the queued size
        renderer.on_resize_window(0, 0);
        renderer.apply_pending_resize();
        assert_eq!(renderer.size(), (128, 96));
        assert_eq!((renderer.gbuffer().width(), renderer.gbuffer().height()), (128, 96));
        assert_eq!(renderer.gbuffer().generation(), 1);

        let mut encoder = renderer.begin_frame();
        let output = offscreen(&renderer);
        let view = output.create_view(&wgpu::TextureViewDescriptor::default());
        let camera = Camera::default();
        renderer.render_frame(
            &mut encoder,
            &view,
            &registry,
            &camera,
            SceneContents {
                drawables: &[],
                terrain: None,
                point_lights: &mut [],
                spot_lights: &mut [],
                directional_lights: &[],
            },
        );
        renderer.context.queue.submit(Some(encoder.finish()));
    }
}
