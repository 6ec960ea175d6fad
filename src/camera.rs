use glam::{Mat4, Quat, Vec3};

use crate::config::CameraConfig;

/// Largest |cos| allowed between the look direction and `up`.
const MAX_LOOK_UP_ALIGNMENT: f32 = 0.999;

/// A first-person camera driven by discrete movement and pan commands.
///
/// The look vector is stored un-normalized: its length is the distance to the
/// look-at center, so raising the eye tilts the view toward a far center
/// instead of swinging it wildly. View and projection matrices are computed
/// from the current state on every read.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    look: Vec3,
    up: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Distance covered by one move command.
    pub step: f32,
    /// Angle of one keyboard pan, in degrees.
    pub pan_step: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            eye: config.eye,
            look: config.look,
            up: config.up,
            fov: config.fov,
            aspect: config.aspect,
            near: config.near,
            far: config.far,
            step: config.step,
            pan_step: config.pan_step,
        };
        camera.fix_up();
        camera
    }

    /// Normalized view direction.
    pub fn look_direction(&self) -> Vec3 {
        self.look.normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// The point the camera looks at.
    pub fn center(&self) -> Vec3 {
        self.eye + self.look
    }

    /// Unit vector pointing to the camera's left.
    pub fn left_direction(&self) -> Vec3 {
        self.up.cross(self.look).normalize()
    }

    pub fn forward(&mut self) {
        self.eye += self.look_direction() * self.step;
    }

    pub fn back(&mut self) {
        self.eye -= self.look_direction() * self.step;
    }

    pub fn strafe_left(&mut self) {
        self.eye += self.left_direction() * self.step;
    }

    pub fn strafe_right(&mut self) {
        self.eye -= self.left_direction() * self.step;
    }

    pub fn pan_left(&mut self) {
        self.yaw(self.pan_step);
    }

    pub fn pan_right(&mut self) {
        self.yaw(-self.pan_step);
    }

    /// Pointer-driven turn to the left by `degrees` (negative turns right).
    pub fn pan_pointer_left(&mut self, degrees: f32) {
        self.yaw(degrees);
    }

    /// Pointer-driven turn to the right by `degrees` (negative turns left).
    pub fn pan_pointer_right(&mut self, degrees: f32) {
        self.yaw(-degrees);
    }

    /// Raises the eye; the look-at center stays where it is.
    pub fn upward(&mut self) {
        self.move_eye_vertically(self.step);
    }

    /// Lowers the eye; the look-at center stays where it is.
    pub fn downward(&mut self) {
        self.move_eye_vertically(-self.step);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center(), self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    fn yaw(&mut self, degrees: f32) {
        let rotation = Quat::from_axis_angle(self.up, degrees.to_radians());
        self.look = rotation * self.look;
        self.fix_up();
    }

    fn move_eye_vertically(&mut self, distance: f32) {
        let center = self.center();
        let eye = self.eye + Vec3::Y * distance;
        let look = center - eye;
        if look.normalize().dot(self.up).abs() > MAX_LOOK_UP_ALIGNMENT {
            log::debug!("ignoring vertical move that would align view with up");
            return;
        }
        self.eye = eye;
        self.look = look;
    }

    /// Makes `up` a unit vector orthogonal to the view direction. An `up`
    /// (nearly) parallel to the view is first replaced by world Y, or Z when
    /// the view itself is vertical.
    fn fix_up(&mut self) {
        let dir = self.look.normalize_or(Vec3::NEG_Z);
        let mut up = self.up.normalize_or(Vec3::Y);
        if dir.dot(up).abs() > MAX_LOOK_UP_ALIGNMENT {
            up = if dir.dot(Vec3::Y).abs() > MAX_LOOK_UP_ALIGNMENT {
                Vec3::Z
            } else {
                Vec3::Y
            };
        }
        self.up = (up - dir * dir.dot(up)).normalize();
    }
}
