//! Cube instances and the render-target seam they are drawn through.
//!
//! A [`Primitive`] is everything one cube draw needs: model transform,
//! material, color, and geometry variant. [`RenderTarget::draw_cube`] takes the
//! whole bundle, so no draw depends on state left behind by an earlier one.

use glam::Mat4;

use crate::material::{Color, Material};
use crate::transform::Transform;

/// Which vertex stream a cube is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeVariant {
    /// Per-face normals and texture coordinates.
    Detailed,
    /// Position-only stream for large environment volumes.
    Fast,
}

/// One drawable unit-cube instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    /// Which body part or environment volume this is, for logs and tests.
    pub label: &'static str,
    pub transform: Transform,
    pub material: Material,
    pub color: Color,
    pub variant: CubeVariant,
}

impl Primitive {
    pub fn new(label: &'static str, transform: Transform) -> Self {
        Self {
            label,
            transform,
            material: Material::SolidColor,
            color: Color::WHITE,
            variant: CubeVariant::Detailed,
        }
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn variant(mut self, variant: CubeVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }
}

/// Per-frame matrices shared by every draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    /// Scene-wide yaw from the rotation control, applied before the view.
    pub global_rotation: Mat4,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            global_rotation: Mat4::IDENTITY,
        }
    }
}

/// The rendering collaborator a frame is composed into.
pub trait RenderTarget {
    /// Uploads view, projection, and global rotation for the coming draws.
    fn begin_frame(&mut self, uniforms: &FrameUniforms);

    /// Clears color and depth.
    fn clear_frame(&mut self);

    /// Draws one unit cube.
    fn draw_cube(&mut self, primitive: &Primitive);
}

/// A [`RenderTarget`] that keeps what it was given, in order.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub uniforms: Option<FrameUniforms>,
    /// How many draws had been issued when each clear happened.
    pub clears: Vec<usize>,
    pub draws: Vec<Primitive>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded draws with the given label.
    pub fn find<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Primitive> + 'a {
        self.draws.iter().filter(move |p| p.label == label)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.draws.iter().map(|p| p.label).collect()
    }
}

impl RenderTarget for FrameRecorder {
    fn begin_frame(&mut self, uniforms: &FrameUniforms) {
        self.uniforms = Some(*uniforms);
    }

    fn clear_frame(&mut self) {
        self.clears.push(self.draws.len());
    }

    fn draw_cube(&mut self, primitive: &Primitive) {
        self.draws.push(*primitive);
    }
}
