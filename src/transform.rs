//! Affine transforms and the snapshot discipline used to build articulated models.
//!
//! [`Transform`] is an immutable 4×4 affine matrix. Every operation returns a new
//! value equal to `self * elementary`, so an operation applied later in a chain
//! acts in the object's *local* frame at that point:
//!
//! ```
//! use paddock::Transform;
//!
//! // Move to (1, 0, 0), then spin about the local Y axis, then stretch locally.
//! let t = Transform::new()
//!     .translate(1.0, 0.0, 0.0)
//!     .rotate(90.0, 0.0, 1.0, 0.0)
//!     .scale(2.0, 1.0, 1.0);
//! # let _ = t;
//! ```
//!
//! # Parent bases
//!
//! Children of a rig part must start from the parent's transform *before* the
//! parent applied its own scale, otherwise every descendant is sheared by the
//! parent's proportions. The three builder types encode that rule:
//!
//! | Type            | May translate/rotate | May scale       | Hands out a child basis |
//! |-----------------|----------------------|-----------------|-------------------------|
//! | [`ParentBasis`] | via [`ParentBasis::joint`] | no        | is one                  |
//! | [`Joint`]       | yes                  | consumes itself | [`Joint::basis`]        |
//! | [`ScaledPart`]  | yes                  | yes             | only [`ScaledPart::inherit_scaled_basis`] |
//!
//! [`Joint::scale`] returns a [`ScaledPart`], which has no `basis()`, so a child
//! can only start from a scaled transform through the explicit escape.

use glam::{Mat4, Vec3};

/// A 4×4 affine transform composed by right-multiplication.
///
/// `Transform` is `Copy`; [`Transform::snapshot`] exists to make the intent of
/// taking an independent copy explicit at call sites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform {
        matrix: Mat4::IDENTITY,
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// Returns `self * T(dx, dy, dz)`.
    pub fn translate(self, dx: f32, dy: f32, dz: f32) -> Self {
        self.then(Mat4::from_translation(Vec3::new(dx, dy, dz)))
    }

    /// Returns `self * R(angle, axis)`.
    ///
    /// The axis is normalized here; a zero-length axis is not rejected and
    /// produces a non-finite matrix.
    pub fn rotate(self, angle_degrees: f32, axis_x: f32, axis_y: f32, axis_z: f32) -> Self {
        let axis = Vec3::new(axis_x, axis_y, axis_z);
        let axis = axis / axis.length();
        self.then(Mat4::from_axis_angle(axis, angle_degrees.to_radians()))
    }

    /// Returns `self * S(sx, sy, sz)`.
    pub fn scale(self, sx: f32, sy: f32, sz: f32) -> Self {
        self.then(Mat4::from_scale(Vec3::new(sx, sy, sz)))
    }

    /// Returns `self * other`.
    pub fn then(self, other: impl Into<Mat4>) -> Self {
        Self {
            matrix: self.matrix * other.into(),
        }
    }

    /// An independent copy of the current state.
    pub fn snapshot(&self) -> Self {
        *self
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Maps a model-space point through this transform.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }
}

impl From<Transform> for Mat4 {
    fn from(transform: Transform) -> Self {
        transform.matrix
    }
}

/// A snapshot of a parent's accumulated transform, taken before the parent's
/// own scale. Children start here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParentBasis(Transform);

impl ParentBasis {
    /// The root basis of a model, usually a world placement.
    pub fn root(transform: Transform) -> Self {
        Self(transform)
    }

    /// Starts a child joint from an independent copy of this basis.
    pub fn joint(&self) -> Joint {
        Joint(self.0.snapshot())
    }

    pub fn transform(&self) -> Transform {
        self.0
    }
}

/// A rig part that has been positioned and oriented but not yet scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Joint(Transform);

impl Joint {
    pub fn translate(self, dx: f32, dy: f32, dz: f32) -> Self {
        Self(self.0.translate(dx, dy, dz))
    }

    pub fn rotate(self, angle_degrees: f32, axis_x: f32, axis_y: f32, axis_z: f32) -> Self {
        Self(self.0.rotate(angle_degrees, axis_x, axis_y, axis_z))
    }

    /// Snapshot for this part's children.
    pub fn basis(&self) -> ParentBasis {
        ParentBasis(self.0.snapshot())
    }

    /// Applies this part's own scale. The result cannot hand out a plain child
    /// basis.
    pub fn scale(self, sx: f32, sy: f32, sz: f32) -> ScaledPart {
        ScaledPart(self.0.scale(sx, sy, sz))
    }

    pub fn transform(&self) -> Transform {
        self.0
    }
}

/// The final draw transform of a part, after its own scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledPart(Transform);

impl ScaledPart {
    /// Translation in the scaled frame, typically to re-anchor the unit cube.
    pub fn translate(self, dx: f32, dy: f32, dz: f32) -> Self {
        Self(self.0.translate(dx, dy, dz))
    }

    pub fn rotate(self, angle_degrees: f32, axis_x: f32, axis_y: f32, axis_z: f32) -> Self {
        Self(self.0.rotate(angle_degrees, axis_x, axis_y, axis_z))
    }

    pub fn scale(self, sx: f32, sy: f32, sz: f32) -> Self {
        Self(self.0.scale(sx, sy, sz))
    }

    /// A child basis that *includes* this part's scale. Children built from it
    /// are sized in units of the parent.
    pub fn inherit_scaled_basis(&self) -> ParentBasis {
        ParentBasis(self.0.snapshot())
    }

    pub fn transform(&self) -> Transform {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn operations_compose_by_right_multiplication() {
        let t = Transform::new()
            .translate(1.0, 2.0, 3.0)
            .rotate(30.0, 0.0, 0.0, 1.0)
            .scale(2.0, 0.5, 1.0);

        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_z(30f32.to_radians())
            * Mat4::from_scale(Vec3::new(2.0, 0.5, 1.0));
        assert!(approx(t.matrix(), expected));
    }

    #[test]
    fn composition_is_associative_in_application_order() {
        let a = Transform::new().translate(0.3, -1.0, 4.0);
        let b = Transform::new().rotate(-72.0, 1.0, 2.0, -0.5);
        let c = Transform::new().scale(3.0, 0.25, 1.5);

        let stepwise = Transform::new()
            .translate(0.3, -1.0, 4.0)
            .rotate(-72.0, 1.0, 2.0, -0.5)
            .scale(3.0, 0.25, 1.5);
        let grouped_left = a.then(b).then(c);
        let grouped_right = a.then(b.then(c));

        assert!(approx(stepwise.matrix(), grouped_left.matrix()));
        assert!(approx(grouped_left.matrix(), grouped_right.matrix()));
    }

    #[test]
    fn later_operations_act_in_local_frame() {
        // Rotate 90° about Y, then translate along local X: ends up on world -Z.
        let t = Transform::new()
            .rotate(90.0, 0.0, 1.0, 0.0)
            .translate(1.0, 0.0, 0.0);
        let p = t.transform_point(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn rotation_axis_is_normalized() {
        let a = Transform::new().rotate(45.0, 0.0, 5.0, 0.0);
        let b = Transform::new().rotate(45.0, 0.0, 1.0, 0.0);
        assert!(approx(a.matrix(), b.matrix()));
    }

    #[test]
    fn snapshots_do_not_alias() {
        let parent = Transform::new().translate(1.0, 0.0, 0.0);
        let left = parent.snapshot().translate(0.0, 1.0, 0.0);
        let right = parent.snapshot().translate(0.0, -1.0, 0.0);

        assert_eq!(parent.transform_point(Vec3::ZERO), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(left.transform_point(Vec3::ZERO), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(right.transform_point(Vec3::ZERO), Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn child_basis_excludes_parent_scale() {
        let root = ParentBasis::root(Transform::new());
        let parent = root.joint().translate(0.0, 1.0, 0.0);
        let basis = parent.basis();
        let _drawn = parent.scale(4.0, 0.5, 2.0);

        let child = basis.joint().translate(1.0, 0.0, 0.0).scale(1.0, 1.0, 1.0);
        let p = child.transform().transform_point(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn inherited_scaled_basis_carries_parent_scale() {
        let part = ParentBasis::root(Transform::new())
            .joint()
            .scale(4.0, 0.5, 2.0);
        let child = part
            .inherit_scaled_basis()
            .joint()
            .translate(1.0, 1.0, 1.0)
            .scale(1.0, 1.0, 1.0);
        let p = child.transform().transform_point(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(4.0, 0.5, 2.0), 1e-6));
    }
}
