//! Per-frame composition and the state the input layer mutates.
//!
//! [`SceneState`] owns everything that persists between frames (camera,
//! rotation slider, animation switch). Once per tick it produces an immutable
//! [`FrameContext`], which [`SceneComposer`] turns into an ordered list of
//! cube draws on a [`RenderTarget`].

use glam::{Mat4, Vec3};

use crate::animation::{AnimationClock, AnimationState};
use crate::camera::Camera;
use crate::config::{LayoutConfig, SceneConfig};
use crate::material::{Color, Material};
use crate::primitive::{CubeVariant, FrameUniforms, Primitive, RenderTarget};
use crate::rig::{build_dog, build_sheep};
use crate::transform::Transform;

/// Everything one frame is drawn from. Built once per tick and never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub view: Mat4,
    pub projection: Mat4,
    /// Scene-wide yaw about +Y, in degrees.
    pub global_rotation_degrees: f32,
    pub animation: AnimationState,
}

impl FrameContext {
    pub fn capture(camera: &Camera, animation: &AnimationState, global_rotation: f32) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            global_rotation_degrees: global_rotation,
            animation: *animation,
        }
    }

    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            view: self.view,
            projection: self.projection,
            global_rotation: Mat4::from_rotation_y(self.global_rotation_degrees.to_radians()),
        }
    }
}

/// Draws the environment and the models in a fixed back-to-front order.
#[derive(Clone, Debug, Default)]
pub struct SceneComposer {
    layout: LayoutConfig,
}

impl SceneComposer {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Skybox first so everything else occludes it, then the ground, the
    /// meadow patch and the inner sky cube, then the sheep and the dog. Foreground parts rely on the
    /// depth test rather than sorting.
    pub fn compose(&self, frame: &FrameContext, target: &mut impl RenderTarget) {
        target.begin_frame(&frame.uniforms());
        target.clear_frame();

        for primitive in environment() {
            target.draw_cube(&primitive);
        }

        let sheep = build_sheep(place(self.layout.sheep), &frame.animation);
        let dog = build_dog(place(self.layout.dog), &frame.animation);
        log::trace!("drawing {} sheep parts, {} dog parts", sheep.len(), dog.len());
        for primitive in sheep.iter().chain(dog.iter()) {
            target.draw_cube(primitive);
        }
    }
}

fn place(at: Vec3) -> Transform {
    Transform::new().translate(at.x, at.y, at.z)
}

/// Carried by the inner sky cube; texture B shading ignores it.
const INNER_SKY_TINT: Color = Color::rgb(0.8, 0.9, 1.0);

fn environment() -> [Primitive; 4] {
    let skybox = Primitive::new(
        "skybox",
        Transform::new()
            .translate(-200.0, -200.0, -200.0)
            .scale(400.0, 400.0, 400.0),
    );
    let ground = Primitive::new(
        "ground",
        Transform::new()
            .translate(-50.0, -0.1, -50.0)
            .scale(100.0, 0.1, 100.0),
    );
    let meadow = Primitive::new(
        "meadow",
        Transform::new()
            .translate(-16.0, -0.1, -16.0)
            .scale(32.0, 0.15, 32.0),
    );
    let inner_sky = Primitive::new(
        "inner_sky",
        Transform::new()
            .translate(-50.0, -50.0, -50.0)
            .scale(100.0, 100.0, 100.0),
    );

    [
        skybox.material(Material::TextureB).variant(CubeVariant::Fast),
        ground.material(Material::TextureA).variant(CubeVariant::Fast),
        meadow.material(Material::TextureA).variant(CubeVariant::Fast),
        inner_sky
            .material(Material::TextureB)
            .color(INNER_SKY_TINT)
            .variant(CubeVariant::Fast),
    ]
}

/// Camera and UI state that persists across frames.
///
/// The `on_*` handlers and setters return `true` when the change should be
/// shown right away, which matters when the animation is off and nothing else
/// is asking for frames.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub camera: Camera,
    global_rotation: f32,
    animation_enabled: bool,
    clock: AnimationClock,
    composer: SceneComposer,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

impl SceneState {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            camera: Camera::from_config(&config.camera),
            global_rotation: 0.0,
            animation_enabled: config.animation.enabled,
            clock: AnimationClock::new(config.animation.params.clone()),
            composer: SceneComposer::new(config.layout.clone()),
        }
    }

    pub fn global_rotation(&self) -> f32 {
        self.global_rotation
    }

    pub fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    pub fn on_forward(&mut self) -> bool {
        self.camera.forward();
        true
    }

    pub fn on_back(&mut self) -> bool {
        self.camera.back();
        true
    }

    pub fn on_strafe_left(&mut self) -> bool {
        self.camera.strafe_left();
        true
    }

    pub fn on_strafe_right(&mut self) -> bool {
        self.camera.strafe_right();
        true
    }

    pub fn on_pan_left(&mut self) -> bool {
        self.camera.pan_left();
        true
    }

    pub fn on_pan_right(&mut self) -> bool {
        self.camera.pan_right();
        true
    }

    /// Turns by `degrees`; positive turns right.
    pub fn on_pan_pointer(&mut self, degrees: f32) -> bool {
        if degrees == 0.0 {
            return false;
        }
        if degrees > 0.0 {
            self.camera.pan_pointer_right(degrees);
        } else {
            self.camera.pan_pointer_left(-degrees);
        }
        true
    }

    pub fn on_up(&mut self) -> bool {
        let before = self.camera.eye;
        self.camera.upward();
        self.camera.eye != before
    }

    pub fn on_down(&mut self) -> bool {
        let before = self.camera.eye;
        self.camera.downward();
        self.camera.eye != before
    }

    pub fn set_global_rotation(&mut self, degrees: f32) -> bool {
        if self.global_rotation == degrees {
            return false;
        }
        log::debug!("global rotation {degrees}");
        self.global_rotation = degrees;
        true
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) -> bool {
        if self.animation_enabled == enabled {
            return false;
        }
        log::debug!("animation {}", if enabled { "on" } else { "off" });
        self.animation_enabled = enabled;
        true
    }

    /// Resizes the projection to a new viewport. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.set_aspect(width as f32 / height as f32);
        }
    }

    /// The context for a tick `elapsed` seconds after start.
    pub fn frame(&self, elapsed: f64) -> FrameContext {
        let animation = self.clock.sample(elapsed, self.animation_enabled);
        FrameContext::capture(&self.camera, &animation, self.global_rotation)
    }

    /// Samples the frame at `elapsed` and composes it into `target`.
    pub fn render(&self, elapsed: f64, target: &mut impl RenderTarget) {
        self.composer.compose(&self.frame(elapsed), target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::FrameRecorder;
    use crate::rig::DOG_FEET;

    fn compose(state: &SceneState, elapsed: f64) -> FrameRecorder {
        let mut recorder = FrameRecorder::new();
        state.render(elapsed, &mut recorder);
        recorder
    }

    #[test]
    fn frame_draws_environment_before_models() {
        let recorder = compose(&SceneState::default(), 0.0);

        assert_eq!(recorder.clears, vec![0]);
        let labels = recorder.labels();
        assert_eq!(&labels[..4], &["skybox", "ground", "meadow", "inner_sky"]);
        assert!(labels[4].starts_with("sheep."));
        assert!(labels.last().unwrap().starts_with("dog."));

        let first_dog = labels.iter().position(|l| l.starts_with("dog.")).unwrap();
        assert!(labels[first_dog..].iter().all(|l| l.starts_with("dog.")));
    }

    #[test]
    fn environment_uses_textures_and_fast_cubes() {
        let recorder = compose(&SceneState::default(), 0.0);

        let skybox = recorder.find("skybox").next().unwrap();
        assert_eq!(skybox.material, Material::TextureB);
        assert_eq!(skybox.variant, CubeVariant::Fast);
        let corner = skybox.transform.transform_point(Vec3::ZERO);
        let far = skybox.transform.transform_point(Vec3::ONE);
        assert!(corner.abs_diff_eq(Vec3::splat(-200.0), 1e-3));
        assert!(far.abs_diff_eq(Vec3::splat(200.0), 1e-3));

        let ground = recorder.find("ground").next().unwrap();
        assert_eq!(ground.material, Material::TextureA);
        let top = ground.transform.transform_point(Vec3::ONE);
        assert!(top.abs_diff_eq(Vec3::new(50.0, 0.0, 50.0), 1e-4));

        let inner_sky = recorder.find("inner_sky").next().unwrap();
        assert_eq!(inner_sky.material, Material::TextureB);
        assert_eq!(inner_sky.variant, CubeVariant::Fast);
        assert_eq!(inner_sky.color, Color::rgb(0.8, 0.9, 1.0));
        let low = inner_sky.transform.transform_point(Vec3::ZERO);
        let high = inner_sky.transform.transform_point(Vec3::ONE);
        assert!(low.abs_diff_eq(Vec3::splat(-50.0), 1e-3));
        assert!(high.abs_diff_eq(Vec3::splat(50.0), 1e-3));

        for model in recorder.draws.iter().skip(4) {
            assert_eq!(model.material, Material::SolidColor);
            assert_eq!(model.variant, CubeVariant::Detailed);
        }
    }

    #[test]
    fn still_scene_legs_match_the_foot_table() {
        let mut state = SceneState::default();
        state.set_animation_enabled(false);
        state.set_global_rotation(0.0);
        let recorder = compose(&state, 12.5);

        let dog_at = SceneConfig::default().layout.dog;
        let upper: Vec<_> = recorder.find("dog.leg.upper").collect();
        assert_eq!(upper.len(), DOG_FEET.len());
        for (leg, foot) in upper.iter().zip(DOG_FEET.iter()) {
            let hip = leg.transform.transform_point(Vec3::new(0.5, 1.0, 0.5)) - dog_at;
            assert!((hip.x - foot.offset_x).abs() < 1e-5);
            assert!((hip.z - foot.offset_z).abs() < 1e-5);

            // A still leg hangs straight down.
            let knee = leg.transform.transform_point(Vec3::new(0.5, 0.0, 0.5)) - dog_at;
            assert!((knee.x - hip.x).abs() < 1e-5);
            assert!((knee.z - hip.z).abs() < 1e-5);
        }
        assert_eq!(recorder.uniforms.unwrap().global_rotation, Mat4::IDENTITY);
    }

    #[test]
    fn global_rotation_reaches_the_uniforms_only() {
        let mut state = SceneState::default();
        let still = compose(&state, 0.0);
        assert!(state.set_global_rotation(90.0));
        let turned = compose(&state, 0.0);

        let rotation = turned.uniforms.unwrap().global_rotation;
        assert!(rotation.abs_diff_eq(Mat4::from_rotation_y(90f32.to_radians()), 1e-6));
        assert_eq!(still.draws, turned.draws);
    }

    #[test]
    fn frame_context_is_built_from_the_camera() {
        let mut state = SceneState::default();
        state.on_forward();
        state.on_pan_left();
        let frame = state.frame(0.0);
        assert_eq!(frame.view, state.camera.view_matrix());
        assert_eq!(frame.projection, state.camera.projection_matrix());
    }

    #[test]
    fn animation_switch_controls_the_pose() {
        let mut state = SceneState::default();
        state.set_animation_enabled(false);
        assert_eq!(state.frame(3.0).animation, AnimationState::rest());

        assert!(state.set_animation_enabled(true));
        let moving = state.frame(std::f64::consts::PI / 12.0).animation;
        assert!((moving.tail_wag - 35.0).abs() < 1e-4);
    }

    #[test]
    fn handlers_report_whether_to_redraw() {
        let mut state = SceneState::default();
        assert!(state.on_forward());
        assert!(state.on_strafe_right());
        assert!(state.on_pan_pointer(2.0));
        assert!(!state.on_pan_pointer(0.0));
        assert!(state.on_up());

        assert!(state.set_global_rotation(15.0));
        assert!(!state.set_global_rotation(15.0));

        let enabled = state.animation_enabled();
        assert!(!state.set_animation_enabled(enabled));
        assert!(state.set_animation_enabled(!enabled));
    }

    #[test]
    fn pointer_pan_sign_picks_the_direction() {
        let mut left = SceneState::default();
        let mut right = SceneState::default();
        left.on_pan_pointer(-10.0);
        right.on_pan_pointer(10.0);
        assert!(left.camera.look_direction().x < 0.0);
        assert!(right.camera.look_direction().x > 0.0);
    }

    #[test]
    fn viewport_sets_the_aspect() {
        let mut state = SceneState::default();
        state.set_viewport(1000, 500);
        assert_eq!(state.camera.aspect, 2.0);
        state.set_viewport(0, 500);
        assert_eq!(state.camera.aspect, 2.0);
    }
}
