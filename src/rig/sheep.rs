//! The sheep: a wool body with a nodding head, a bare face, and four legs.

use crate::animation::AnimationState;
use crate::material::Color;
use crate::primitive::Primitive;
use crate::transform::{ParentBasis, Transform};

use super::PartList;

const WOOL: Color = Color::rgb(0.62, 0.77, 0.64);
const SKIN: Color = Color::rgb(1.0, 0.91, 0.65);

/// The body and head are authored facing -Z and turned around.
const FACING: f32 = 170.0;
const LEG_HEIGHT: f32 = 0.1;
const LEG_SPOTS: [(f32, f32); 4] = [(0.08, 0.22), (-0.08, 0.22), (0.08, -0.05), (-0.08, -0.05)];

/// Builds the sheep at `placement`. Only the head moves (`anim.head_nod`).
pub fn build_sheep(placement: Transform, anim: &AnimationState) -> Vec<Primitive> {
    let mut parts = PartList::with_capacity(8);
    let root = ParentBasis::root(placement.translate(0.0, LEG_HEIGHT, 0.0));

    let body = root.joint().rotate(FACING, 0.0, 1.0, 0.0);
    let body_basis = body.basis();
    parts.push(
        "sheep.body",
        body.scale(0.25, 0.25, 0.35).translate(-0.5, 0.0, -0.25),
        WOOL,
    );

    let head = root
        .joint()
        .rotate(FACING, 0.0, 1.0, 0.0)
        .rotate(-anim.head_nod, 1.0, 0.0, 0.0)
        .scale(0.35, 0.35, 0.35)
        .translate(-0.5, 0.25, -1.25);
    parts.push("sheep.head", head, WOOL);

    // The head's front is its local z = 0 face; the face plate sits just outside it.
    let face = head
        .inherit_scaled_basis()
        .joint()
        .translate(0.15, 0.1, -0.02)
        .scale(0.7, 0.6, 0.05);
    parts.push("sheep.face", face, SKIN);

    for (x, z) in LEG_SPOTS {
        let leg = body_basis.joint().translate(x, 0.0, z);
        parts.push(
            "sheep.leg",
            leg.scale(0.06, LEG_HEIGHT, 0.06).translate(-0.5, -1.0, -0.5),
            SKIN,
        );
    }

    parts.finish()
}
