//! The dog: body, neck, head (snout, ears, eyes), four legs, and a tail.

use crate::animation::AnimationState;
use crate::material::Color;
use crate::primitive::Primitive;
use crate::transform::{ParentBasis, Transform};

use super::PartList;

const FUR: Color = Color::rgb(0.72, 0.5, 0.3);
const DARK_FUR: Color = Color::rgb(0.42, 0.27, 0.15);
const EYE_WHITE: Color = Color::rgb(0.96, 0.96, 0.94);
const PUPIL: Color = Color::rgb(0.05, 0.05, 0.06);
const NOSE: Color = Color::rgb(0.08, 0.06, 0.06);
const PAD: Color = Color::rgb(0.3, 0.18, 0.16);

/// Height of the body pivot (its center) above the model origin.
pub(crate) const BODY_HEIGHT: f32 = 0.58;
const BODY_SIZE: [f32; 3] = [0.34, 0.28, 0.8];

/// Leg joints sit this far below the body pivot.
pub(crate) const LEG_ATTACH_Y: f32 = -0.1;
pub(crate) const LEG_WIDTH: f32 = 0.09;
pub(crate) const UPPER_LEG: f32 = 0.24;
const LOWER_LEG_WIDTH: f32 = 0.075;
const LOWER_LEG: f32 = 0.2;
const PAW_HEIGHT: f32 = 0.04;

/// Fractions of the leg swing signal applied at each leg joint.
const UPPER_SWING: f32 = 0.8;
const LOWER_SWING: f32 = 0.4;

const NECK_LEAN: f32 = 25.0;
const EAR_TIP_FLOP: f32 = 1.5;
/// Pupils sit this far in front of the eye whites to stay out of their depth.
const PUPIL_LIFT: f32 = 0.002;

const TAIL_BASE_YAW: f32 = 30.0;
const TAIL_LIFT: f32 = 35.0;
const TAIL_TIP_WAG: f32 = 1.5;

/// Where a leg attaches under the body and how it moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootPosition {
    /// Lateral offset from the body pivot.
    pub offset_x: f32,
    /// Fore/aft offset from the body pivot; positive is toward the head.
    pub offset_z: f32,
    /// +1 or -1: which way this leg swings for a positive swing angle.
    pub swing_sign: f32,
    /// Multiplier on the leg segment lengths.
    pub length_scale: f32,
}

/// Front-right, front-left, back-right, back-left. Diagonal pairs share a
/// swing sign, which gives a trot.
pub const DOG_FEET: [FootPosition; 4] = [
    FootPosition {
        offset_x: 0.11,
        offset_z: 0.3,
        swing_sign: 1.0,
        length_scale: 0.95,
    },
    FootPosition {
        offset_x: -0.11,
        offset_z: 0.3,
        swing_sign: -1.0,
        length_scale: 0.95,
    },
    FootPosition {
        offset_x: 0.11,
        offset_z: -0.3,
        swing_sign: -1.0,
        length_scale: 1.0,
    },
    FootPosition {
        offset_x: -0.11,
        offset_z: -0.3,
        swing_sign: 1.0,
        length_scale: 1.0,
    },
];

/// Builds the dog at `placement`, posed by `anim`.
///
/// The dog faces +Z. The snout and nose are sized relative to the head (they
/// start from the head's scaled transform); every other part starts from its
/// parent's pre-scale basis.
pub fn build_dog(placement: Transform, anim: &AnimationState) -> Vec<Primitive> {
    let mut parts = PartList::with_capacity(32);

    let body = ParentBasis::root(placement)
        .joint()
        .translate(0.0, BODY_HEIGHT + anim.hover, 0.0)
        .rotate(anim.body_sway, 0.0, 1.0, 0.0);
    let body_basis = body.basis();
    let [bx, by, bz] = BODY_SIZE;
    parts.push(
        "dog.body",
        body.scale(bx, by, bz).translate(-0.5, -0.5, -0.5),
        FUR,
    );

    build_head(&mut parts, &body_basis, anim);

    for foot in &DOG_FEET {
        build_leg(&mut parts, &body_basis, foot, anim.leg_swing);
    }

    let tail = body_basis
        .joint()
        .translate(0.0, 0.1, -0.4)
        .rotate(TAIL_BASE_YAW + anim.tail_wag, 0.0, 1.0, 0.0)
        .rotate(TAIL_LIFT, 1.0, 0.0, 0.0);
    let tail_basis = tail.basis();
    parts.push(
        "dog.tail.base",
        tail.scale(0.05, 0.05, 0.2).translate(-0.5, -0.5, -1.0),
        FUR,
    );
    let tip = tail_basis
        .joint()
        .translate(0.0, 0.0, -0.2)
        .rotate(anim.tail_wag * TAIL_TIP_WAG, 0.0, 1.0, 0.0);
    parts.push(
        "dog.tail.tip",
        tip.scale(0.04, 0.04, 0.15).translate(-0.5, -0.5, -1.0),
        DARK_FUR,
    );

    parts.finish()
}

fn build_head(parts: &mut PartList, body: &ParentBasis, anim: &AnimationState) {
    let neck = body
        .joint()
        .translate(0.0, 0.08, 0.32)
        .rotate(NECK_LEAN + anim.breathe, 1.0, 0.0, 0.0);
    let neck_basis = neck.basis();
    parts.push(
        "dog.neck",
        neck.scale(0.16, 0.26, 0.16).translate(-0.5, 0.0, -0.5),
        FUR,
    );

    let head = neck_basis
        .joint()
        .translate(0.0, 0.24, 0.0)
        .rotate(-NECK_LEAN, 1.0, 0.0, 0.0)
        .rotate(anim.head_tilt, 0.0, 0.0, 1.0);
    let head_basis = head.basis();
    let head_part = head.scale(0.26, 0.24, 0.26).translate(-0.5, -0.5, -0.5);
    parts.push("dog.head", head_part, FUR);

    // In head units: the head cube is [0,1]^3 here.
    let snout = head_part
        .inherit_scaled_basis()
        .joint()
        .translate(0.2, 0.0, 1.0)
        .scale(0.6, 0.45, 0.5);
    parts.push("dog.snout", snout, FUR);
    let nose = snout
        .inherit_scaled_basis()
        .joint()
        .translate(0.3, 0.6, 1.0)
        .scale(0.4, 0.4, 0.15);
    parts.push("dog.nose", nose, NOSE);

    for side in [1.0_f32, -1.0] {
        let ear = head_basis
            .joint()
            .translate(side * 0.09, 0.12, -0.04)
            .rotate(-side * anim.ear_flop, 0.0, 0.0, 1.0);
        let ear_basis = ear.basis();
        parts.push(
            "dog.ear.base",
            ear.scale(0.07, 0.1, 0.04).translate(-0.5, 0.0, -0.5),
            FUR,
        );
        let tip = ear_basis
            .joint()
            .translate(0.0, 0.1, 0.0)
            .rotate(-side * anim.ear_flop * EAR_TIP_FLOP, 0.0, 0.0, 1.0);
        parts.push(
            "dog.ear.tip",
            tip.scale(0.05, 0.07, 0.035).translate(-0.5, 0.0, -0.5),
            DARK_FUR,
        );
    }

    for side in [1.0_f32, -1.0] {
        let white = head_basis.joint().translate(side * 0.07, 0.04, 0.13);
        let white_basis = white.basis();
        parts.push(
            "dog.eye.white",
            white.scale(0.06, 0.06, 0.01).translate(-0.5, -0.5, 0.0),
            EYE_WHITE,
        );
        let pupil = white_basis.joint().translate(0.0, 0.0, 0.01 + PUPIL_LIFT);
        parts.push(
            "dog.eye.pupil",
            pupil.scale(0.03, 0.03, 0.005).translate(-0.5, -0.5, 0.0),
            PUPIL,
        );
    }
}

fn build_leg(parts: &mut PartList, body: &ParentBasis, foot: &FootPosition, swing: f32) {
    let len = foot.length_scale;

    let upper = body
        .joint()
        .translate(foot.offset_x, LEG_ATTACH_Y, foot.offset_z)
        .rotate(foot.swing_sign * swing * UPPER_SWING, 1.0, 0.0, 0.0);
    let upper_basis = upper.basis();
    parts.push(
        "dog.leg.upper",
        upper
            .scale(LEG_WIDTH, UPPER_LEG * len, LEG_WIDTH)
            .translate(-0.5, -1.0, -0.5),
        FUR,
    );

    let lower = upper_basis
        .joint()
        .translate(0.0, -UPPER_LEG * len, 0.0)
        .rotate(foot.swing_sign * swing * LOWER_SWING, 1.0, 0.0, 0.0);
    let lower_basis = lower.basis();
    parts.push(
        "dog.leg.lower",
        lower
            .scale(LOWER_LEG_WIDTH, LOWER_LEG * len, LOWER_LEG_WIDTH)
            .translate(-0.5, -1.0, -0.5),
        FUR,
    );

    let paw = lower_basis
        .joint()
        .translate(0.0, -LOWER_LEG * len, 0.015);
    let paw_basis = paw.basis();
    parts.push(
        "dog.leg.paw",
        paw.scale(0.1, PAW_HEIGHT, 0.12).translate(-0.5, -1.0, -0.5),
        DARK_FUR,
    );

    let pad = paw_basis
        .joint()
        .translate(0.0, -PAW_HEIGHT - 0.001, -0.02);
    parts.push(
        "dog.leg.pad",
        pad.scale(0.06, 0.012, 0.05).translate(-0.5, 0.0, -0.5),
        PAD,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use std::f32::consts::PI;

    use crate::animation::AnimationClock;

    fn parts_named<'a>(parts: &'a [Primitive], label: &str) -> Vec<&'a Primitive> {
        parts.iter().filter(|p| p.label == label).collect()
    }

    #[test]
    fn dog_has_every_part() {
        let parts = build_dog(Transform::new(), &AnimationState::rest());
        let count = |label| parts_named(&parts, label).len();

        assert_eq!(count("dog.body"), 1);
        assert_eq!(count("dog.neck"), 1);
        assert_eq!(count("dog.head"), 1);
        assert_eq!(count("dog.snout"), 1);
        assert_eq!(count("dog.nose"), 1);
        assert_eq!(count("dog.ear.base"), 2);
        assert_eq!(count("dog.ear.tip"), 2);
        assert_eq!(count("dog.eye.white"), 2);
        assert_eq!(count("dog.eye.pupil"), 2);
        for segment in ["dog.leg.upper", "dog.leg.lower", "dog.leg.paw", "dog.leg.pad"] {
            assert_eq!(count(segment), 4);
        }
        assert_eq!(count("dog.tail.base"), 1);
        assert_eq!(count("dog.tail.tip"), 1);
        assert_eq!(parts.len(), 31);
    }

    #[test]
    fn rest_pose_legs_match_the_foot_table() {
        let parts = build_dog(Transform::new(), &AnimationState::rest());
        let uppers = parts_named(&parts, "dog.leg.upper");

        for (part, foot) in uppers.iter().zip(DOG_FEET.iter()) {
            let expected = Mat4::from_translation(Vec3::new(
                foot.offset_x,
                BODY_HEIGHT + LEG_ATTACH_Y,
                foot.offset_z,
            )) * Mat4::from_scale(Vec3::new(
                LEG_WIDTH,
                UPPER_LEG * foot.length_scale,
                LEG_WIDTH,
            )) * Mat4::from_translation(Vec3::new(-0.5, -1.0, -0.5));
            assert!(
                part.model_matrix().abs_diff_eq(expected, 1e-6),
                "leg at ({}, {}) moved",
                foot.offset_x,
                foot.offset_z
            );
        }
    }

    #[test]
    fn rest_pose_legs_hang_straight_down() {
        let parts = build_dog(Transform::new(), &AnimationState::rest());
        let paws = parts_named(&parts, "dog.leg.paw");
        for (paw, foot) in paws.iter().zip(DOG_FEET.iter()) {
            // Center of the paw's top face sits under the attachment point.
            let top = paw.transform.transform_point(Vec3::new(0.5, 1.0, 0.5));
            assert!((top.x - foot.offset_x).abs() < 1e-5);
            assert!((top.z - (foot.offset_z + 0.015)).abs() < 1e-5);
        }
    }

    #[test]
    fn swing_rotates_lower_leg_less_than_upper() {
        let anim = AnimationState {
            leg_swing: 20.0,
            ..AnimationState::rest()
        };
        let parts = build_dog(Transform::new(), &anim);
        let upper = parts_named(&parts, "dog.leg.upper")[0].model_matrix();
        let lower = parts_named(&parts, "dog.leg.lower")[0].model_matrix();

        let tilt = |m: Mat4| {
            let axis = m.transform_vector3(Vec3::Y).normalize();
            axis.angle_between(Vec3::Y).to_degrees()
        };
        assert!((tilt(upper) - 16.0).abs() < 1e-3);
        // Lower leg compounds the upper swing: 0.8 + 0.4 of the signal.
        assert!((tilt(lower) - 24.0).abs() < 1e-3);
    }

    #[test]
    fn children_do_not_inherit_body_scale() {
        let parts = build_dog(Transform::new(), &AnimationState::rest());
        let eye = parts_named(&parts, "dog.eye.white")[0].model_matrix();
        let (scale, _, _) = eye.to_scale_rotation_translation();
        assert!(scale.abs_diff_eq(Vec3::new(0.06, 0.06, 0.01), 1e-5));
    }

    #[test]
    fn snout_is_sized_in_head_units() {
        let parts = build_dog(Transform::new(), &AnimationState::rest());
        let snout = parts_named(&parts, "dog.snout")[0].model_matrix();
        let (scale, _, _) = snout.to_scale_rotation_translation();
        assert!(scale.abs_diff_eq(Vec3::new(0.26 * 0.6, 0.24 * 0.45, 0.26 * 0.5), 1e-5));
    }

    #[test]
    fn pupils_sit_in_front_of_eye_whites() {
        let parts = build_dog(Transform::new(), &AnimationState::rest());
        let white = parts_named(&parts, "dog.eye.white")[0];
        let pupil = parts_named(&parts, "dog.eye.pupil")[0];
        let white_front = white.transform.transform_point(Vec3::new(0.5, 0.5, 1.0));
        let pupil_back = pupil.transform.transform_point(Vec3::new(0.5, 0.5, 0.0));
        assert!(pupil_back.z > white_front.z);
    }

    #[test]
    fn tail_tip_compounds_the_wag() {
        let clock = AnimationClock::default();
        let anim = clock.sample(std::f64::consts::PI / 12.0, true);
        assert!((anim.tail_wag - 35.0).abs() < 1e-4);

        let parts = build_dog(Transform::new(), &anim);
        let base = parts_named(&parts, "dog.tail.base")[0].model_matrix();
        let tip = parts_named(&parts, "dog.tail.tip")[0].model_matrix();
        let back = |m: Mat4| m.transform_vector3(Vec3::NEG_Z).normalize();
        // Yaw about +Y swings the tail from straight back toward -X.
        let heading = back(base).x.atan2(-back(base).z) * 180.0 / PI;
        assert!((heading + (TAIL_BASE_YAW + 35.0)).abs() < 1e-2);
        let bend = back(base).angle_between(back(tip)).to_degrees();
        assert!((bend - 35.0 * TAIL_TIP_WAG).abs() < 1e-2);
    }

    #[test]
    fn placement_moves_the_whole_dog() {
        let anim = AnimationState::rest();
        let here = build_dog(Transform::new(), &anim);
        let there = build_dog(Transform::new().translate(2.0, 0.0, -1.0), &anim);
        for (a, b) in here.iter().zip(there.iter()) {
            let pa = a.transform.transform_point(Vec3::ZERO);
            let pb = b.transform.transform_point(Vec3::ZERO);
            assert!((pb - pa).abs_diff_eq(Vec3::new(2.0, 0.0, -1.0), 1e-5));
        }
    }
}
