//! Articulated models built from unit cubes.
//!
//! A model is rebuilt from scratch every frame: each part starts from its
//! parent's [`ParentBasis`](crate::transform::ParentBasis), applies its own
//! offset and animated rotation, hands a snapshot to its children, then scales
//! itself into the cube that gets drawn. Nothing survives the frame except the
//! returned [`Primitive`] list.
//!
//! All cubes span `[0, 1]^3` in model space, so parts re-anchor themselves
//! with a translate in their scaled frame (for example `(-0.5, -1.0, -0.5)` to
//! hang a leg straight down from its joint).

mod dog;
mod sheep;

pub use dog::{DOG_FEET, FootPosition, build_dog};
pub use sheep::build_sheep;

use crate::material::{Color, Material};
use crate::primitive::{CubeVariant, Primitive};
use crate::transform::ScaledPart;

/// Collects the cubes of one model in draw order.
#[derive(Debug, Default)]
struct PartList {
    parts: Vec<Primitive>,
}

impl PartList {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            parts: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, label: &'static str, part: ScaledPart, color: Color) {
        log::trace!("rig part {label}");
        self.parts.push(
            Primitive::new(label, part.transform())
                .material(Material::SolidColor)
                .color(color)
                .variant(CubeVariant::Detailed),
        );
    }

    fn finish(self) -> Vec<Primitive> {
        self.parts
    }
}
