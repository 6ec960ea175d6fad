//! Colors and the closed set of shading modes a cube can be drawn with.
//!
//! The material code travels to the fragment shader as a plain integer, so any
//! value outside the known set is representable. Such values shade with
//! [`Material::FALLBACK_COLOR`], which makes a binding bug visible on screen
//! instead of failing the frame.
//!
//! | Code | Variant                 | Output                         |
//! |------|-------------------------|--------------------------------|
//! | -2   | [`Material::SolidColor`] | the instance color            |
//! | -1   | [`Material::UvDebug`]    | `(u, v, 1, 1)`                |
//! | 0    | [`Material::TextureA`]   | sample of texture unit 0      |
//! | 1    | [`Material::TextureB`]   | sample of texture unit 1      |
//! | else | [`Material::Unknown`]    | [`Material::FALLBACK_COLOR`]  |
//!
//! [`Material::shade`] is the CPU statement of that table; `shaders/cube.wgsl`
//! implements the same table on the GPU.

use glam::Vec2;

/// Straight-alpha RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// How a cube's surface color is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Material {
    SolidColor,
    UvDebug,
    TextureA,
    TextureB,
    /// Any code the shader does not know about.
    Unknown(i32),
}

impl Material {
    /// Diagnostic color for unknown material codes.
    pub const FALLBACK_COLOR: Color = Color::rgba(1.0, 0.2, 0.2, 1.0);

    pub fn from_code(code: i32) -> Self {
        match code {
            -2 => Material::SolidColor,
            -1 => Material::UvDebug,
            0 => Material::TextureA,
            1 => Material::TextureB,
            other => Material::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Material::SolidColor => -2,
            Material::UvDebug => -1,
            Material::TextureA => 0,
            Material::TextureB => 1,
            Material::Unknown(code) => code,
        }
    }

    /// Resolves the fragment color for this material.
    ///
    /// `sample_a` and `sample_b` are what texture units 0 and 1 return at `uv`;
    /// an unbound texture is whatever the caller passes, usually blank.
    pub fn shade(self, color: Color, uv: Vec2, sample_a: Color, sample_b: Color) -> Color {
        match self {
            Material::SolidColor => color,
            Material::UvDebug => Color::rgba(uv.x, uv.y, 1.0, 1.0),
            Material::TextureA => sample_a,
            Material::TextureB => sample_b,
            Material::Unknown(_) => Self::FALLBACK_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRASS: Color = Color::rgb(0.2, 0.6, 0.2);
    const SKY: Color = Color::rgb(0.5, 0.7, 1.0);

    #[test]
    fn solid_color_code_shades_with_instance_color() {
        let material = Material::from_code(-2);
        assert_eq!(material, Material::SolidColor);
        let out = material.shade(Color::rgba(1.0, 0.0, 0.0, 1.0), Vec2::new(0.3, 0.7), GRASS, SKY);
        assert_eq!(out, Color::RED);
    }

    #[test]
    fn undefined_code_shades_with_fallback() {
        let material = Material::from_code(5);
        assert_eq!(material, Material::Unknown(5));
        for color in [Color::RED, Color::WHITE, GRASS] {
            let out = material.shade(color, Vec2::new(0.5, 0.5), GRASS, SKY);
            assert_eq!(out, Material::FALLBACK_COLOR);
        }
    }

    #[test]
    fn texture_units_select_their_samples() {
        let uv = Vec2::new(0.1, 0.9);
        assert_eq!(Material::TextureA.shade(Color::WHITE, uv, GRASS, SKY), GRASS);
        assert_eq!(Material::TextureB.shade(Color::WHITE, uv, GRASS, SKY), SKY);
    }

    #[test]
    fn uv_debug_shows_coordinates() {
        let out = Material::UvDebug.shade(Color::BLACK, Vec2::new(0.25, 0.75), GRASS, SKY);
        assert_eq!(out, Color::rgba(0.25, 0.75, 1.0, 1.0));
    }
}
