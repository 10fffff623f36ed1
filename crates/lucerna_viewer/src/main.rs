//! Demo scene: a ring of coloured point lights orbiting spinning boxes on a
//! streamed ground grid, two spot lights, a dim directional fill and a
//! gradient sky.
//!
//! | Input             | Action                                  |
//! |-------------------|-----------------------------------------|
//! | WASD / right drag | move / orbit the camera, wheel zooms    |
//! | left click        | select the box under the cursor         |
//! | arrow keys        | move the selected box                   |
//! | C                 | toggle collider wireframes              |
//! | V                 | toggle light-volume wireframes          |
//! | G                 | toggle the G-buffer debug strip         |
//! | P                 | pause the lights                        |
//! | Esc               | quit                                    |

mod props;
mod terrain;

use anyhow::Context as _;
use lucerna_app::camera::configured_camera;
use lucerna_app::{App, AppConfig, AppContext, Frame, KeyCode, LucernaApp, MouseButton, OrbitController};
use lucerna_core::glam::{Vec2, Vec3};
use lucerna_core::{Camera, Color, DirectionalLight, PointLight, SpotLight, Transform};
use lucerna_renderer::geometry::primitives;
use lucerna_renderer::{MaterialDesc, MeshDrawable, ResourceRegistry, SceneContents};

use props::{pick, Prop};
use terrain::GridTerrain;

const LIGHT_RING_RADIUS: f32 = 12.0;
const LIGHT_COUNT: usize = 16;
const CHUNK_SIZE: f32 = 20.0;

#[derive(Default)]
struct Viewer {
    camera: Camera,
    orbit: OrbitController,
    props: Vec<Prop>,
    drawables: Vec<MeshDrawable>,
    terrain: Option<GridTerrain>,
    point_lights: Vec<PointLight>,
    spot_lights: Vec<SpotLight>,
    directional_lights: Vec<DirectionalLight>,
    selected: Option<usize>,
    show_colliders: bool,
    show_light_volumes: bool,
    show_gbuffer: bool,
    paused: bool,
    light_phase: f32,
}

impl Viewer {
    fn build_scene(&mut self, registry: &mut ResourceRegistry, device: &lucerna_renderer::wgpu::Device) -> anyhow::Result<()> {
        let (vertices, indices) = primitives::cube_data();
        let cube = registry.create_mesh("Cube", &vertices, &indices);
        let (cube_min, cube_max) = registry
            .mesh(cube)
            .map(|m| (m.bottom_left, m.top_right))
            .context("cube mesh vanished")?;

        let ground_mesh = registry.add_mesh(primitives::plane(device, CHUNK_SIZE, 8));
        let ground = registry.create_material(MaterialDesc {
            albedo: Color::rgb(0.45, 0.47, 0.42),
            specular: 0.1,
            ..MaterialDesc::default()
        })?;
        self.terrain = Some(GridTerrain {
            mesh: ground_mesh,
            material: ground,
            chunk_size: CHUNK_SIZE,
            radius: 3,
            height: 0.0,
        });

        // checkerboard albedo for the boxes
        let mut pixels = Vec::with_capacity(8 * 8 * 4);
        for y in 0..8u32 {
            for x in 0..8u32 {
                let v = if (x + y) % 2 == 0 { 235 } else { 90 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let checker = registry.add_texture_rgba8("Checker", 8, 8, &pixels)?;

        let tints = [Color::WHITE, Color::ORANGE, Color::SKY_BLUE, Color::rgb(0.8, 0.3, 0.6)];
        let materials = tints
            .iter()
            .map(|&albedo| {
                registry.create_material(MaterialDesc {
                    albedo_texture: Some(checker),
                    albedo,
                    specular: 0.6,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (i, material) in (0..9).zip(materials.iter().cycle()) {
            let angle = i as f32 / 9.0 * std::f32::consts::TAU;
            let height = 1.0 + (i % 3) as f32;
            let transform = Transform::from_position(Vec3::new(angle.cos() * 6.0, height * 0.5, angle.sin() * 6.0))
                .with_scale(Vec3::new(1.5, height, 1.5));
            let spin = if i % 2 == 0 { 0.4 } else { -0.25 };
            self.props
                .push(Prop::new(transform, cube, *material, cube_min, cube_max).with_spin(spin));
        }
        self.props.push(Prop::new(
            Transform::from_position(Vec3::new(0.0, 1.5, 0.0)).with_scale(Vec3::splat(3.0)),
            cube,
            materials[0],
            cube_min,
            cube_max,
        ));

        // ── Lights ───────────────────────────────────────────────────────────
        self.point_lights = (0..LIGHT_COUNT)
            .map(|i| {
                let hue = i as f32 / LIGHT_COUNT as f32;
                PointLight::new(Vec3::ZERO)
                    .with_intensity(6.0 + (i % 4) as f32 * 4.0)
                    .with_color(hue_color(hue))
            })
            .collect();
        self.spot_lights = vec![
            SpotLight::new(Vec3::new(-8.0, 8.0, 8.0), Vec3::new(1.0, -1.0, -1.0))
                .with_intensity(40.0)
                .with_angle(20f32.to_radians()),
            SpotLight::new(Vec3::new(8.0, 10.0, -8.0), Vec3::new(-1.0, -1.2, 1.0))
                .with_intensity(50.0)
                .with_angle(15f32.to_radians())
                .with_color(Color::rgb(1.0, 0.85, 0.6)),
        ];
        self.directional_lights = vec![DirectionalLight::new(Vec3::new(-0.3, -1.0, -0.2)).with_intensity(0.15)];
        self.place_lights();

        log::info!(
            "scene: {} props, {} point lights, {} spot lights",
            self.props.len(),
            self.point_lights.len(),
            self.spot_lights.len()
        );
        Ok(())
    }

    fn place_lights(&mut self) {
        let n = self.point_lights.len().max(1) as f32;
        for (i, light) in self.point_lights.iter_mut().enumerate() {
            let a = self.light_phase + i as f32 / n * std::f32::consts::TAU;
            let r = LIGHT_RING_RADIUS * (0.6 + 0.4 * ((i % 3) as f32 / 2.0));
            light.set_position(Vec3::new(a.cos() * r, 1.0 + (a * 2.0).sin().abs() * 2.0, a.sin() * r));
        }
    }

    fn handle_input(&mut self, ctx: &mut AppContext) {
        if ctx.input.just_pressed(KeyCode::Escape) {
            ctx.request_exit();
            return;
        }
        let input = &*ctx.input;
        if input.just_pressed(KeyCode::KeyC) {
            self.show_colliders = !self.show_colliders;
        }
        if input.just_pressed(KeyCode::KeyV) {
            self.show_light_volumes = !self.show_light_volumes;
        }
        if input.just_pressed(KeyCode::KeyG) {
            self.show_gbuffer = !self.show_gbuffer;
        }
        if input.just_pressed(KeyCode::KeyP) {
            self.paused = !self.paused;
        }

        if input.just_clicked(MouseButton::Left) {
            let (x, y) = input.mouse_position();
            let ndc = Camera::pixel_to_ndc(Vec2::new(x as f32, y as f32), ctx.window_size.0, ctx.window_size.1);
            self.selected = pick(&self.camera, ndc, &self.props);
            log::debug!("picked {:?}", self.selected);
        }

        if let Some(prop) = self.selected.and_then(|i| self.props.get_mut(i)) {
            let step = 4.0 * ctx.time.delta;
            let mut delta = Vec3::ZERO;
            for (key, dir) in [
                (KeyCode::ArrowLeft, Vec3::NEG_X),
                (KeyCode::ArrowRight, Vec3::X),
                (KeyCode::ArrowUp, Vec3::NEG_Z),
                (KeyCode::ArrowDown, Vec3::Z),
            ] {
                if ctx.input.key_held(key) {
                    delta += dir;
                }
            }
            if delta != Vec3::ZERO {
                prop.move_by(delta * step);
            }
        }

        self.orbit.update(&mut self.camera, &mut *ctx.input, ctx.time.delta);
    }
}

impl LucernaApp for Viewer {
    fn setup(&mut self, ctx: &mut AppContext) {
        let (width, height) = ctx.window_size;
        let (Some(renderer), Some(registry)) = (ctx.renderer.as_deref_mut(), ctx.registry.as_deref_mut()) else {
            return;
        };

        self.camera = configured_camera(renderer.config(), Vec3::new(0.0, 12.0, 24.0), Vec3::ZERO, width, height);
        self.orbit = OrbitController::from_camera(&self.camera);

        let sky = renderer.create_gradient_skybox(
            Color::rgb(0.05, 0.1, 0.3),
            Color::rgb(0.5, 0.55, 0.65),
            Color::rgb(0.12, 0.1, 0.08),
        );
        renderer.set_backdrop(Some(Box::new(sky)));

        let device = renderer.context.device.clone();
        if let Err(err) = self.build_scene(registry, &device) {
            log::error!("failed to build scene: {err:#}");
            ctx.request_exit();
        }
    }

    fn update(&mut self, ctx: &mut AppContext) {
        self.handle_input(ctx);

        let dt = ctx.time.delta;
        if !self.paused {
            self.light_phase += dt * 0.3;
            self.place_lights();
            for prop in &mut self.props {
                prop.update(dt);
            }
        }
        self.drawables.clear();
        self.drawables.extend(self.props.iter().map(Prop::drawable));

        if ctx.time.frame_count % 600 == 0 {
            log::debug!("{:.0} fps", ctx.time.fps);
        }

        let Some(renderer) = ctx.renderer.as_deref_mut() else {
            return;
        };
        if self.show_colliders {
            renderer.debug_draw_colliders(&self.camera, &self.props, self.selected);
        }
        if self.show_light_volumes {
            renderer.debug_draw_light_volumes(&self.camera, &self.point_lights, &self.spot_lights);
        }
        if self.show_gbuffer {
            renderer.debug_blit_gbuffer();
        }
    }

    fn draw_3d(&mut self, frame: &mut Frame, _ctx: &mut AppContext) {
        let stats = frame.render(
            &self.camera,
            SceneContents {
                drawables: &self.drawables,
                terrain: self.terrain.as_ref().map(|t| t as &dyn lucerna_renderer::TerrainSource),
                point_lights: &mut self.point_lights,
                spot_lights: &mut self.spot_lights,
                directional_lights: &self.directional_lights,
            },
        );
        log::trace!("{stats:?}");
    }

    fn on_resize(&mut self, new_size: (u32, u32), _ctx: &mut AppContext) {
        self.camera.set_aspect(new_size.0, new_size.1);
    }
}

/// Fully saturated colour for `hue` in `[0, 1)`.
fn hue_color(hue: f32) -> Color {
    let h = hue.rem_euclid(1.0) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    Color::rgb(r, g, b)
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "lucerna.toml".to_string());
    let config = AppConfig::load(&path)?;
    App::new(Viewer::default()).with_config(config).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_wheel_hits_primaries() {
        for (hue, expected) in [(0.0, Color::RED), (1.0 / 3.0, Color::GREEN), (2.0 / 3.0, Color::BLUE)] {
            let got = hue_color(hue).to_vec3();
            assert!(got.abs_diff_eq(expected.to_vec3(), 1e-5), "hue {hue}: {got:?}");
        }
    }

    #[test]
    fn lights_orbit_inside_ring() {
        let mut viewer = Viewer {
            point_lights: vec![PointLight::default(); 6],
            ..Viewer::default()
        };
        viewer.light_phase = 1.3;
        viewer.place_lights();
        for light in &viewer.point_lights {
            let p = light.position();
            assert!(Vec3::new(p.x, 0.0, p.z).length() <= LIGHT_RING_RADIUS + 1e-3);
            assert!(p.y >= 1.0);
        }
    }
}
