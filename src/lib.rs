//! # Paddock
//!
//! A small real-time scene: a ground plane, a skybox, and an animated dog and
//! sheep, all drawn from one unit cube.
//!
//! The interesting part is CPU-side and GPU-free. [`Transform`] composes by
//! right-multiplication, the [`rig`] builders turn an [`AnimationState`] into a
//! list of [`Primitive`]s, and [`SceneComposer`] orders them onto any
//! [`RenderTarget`]. The window, wgpu pipelines, and textures are thin glue
//! around that.
//!
//! ```
//! use paddock::{AnimationClock, FrameRecorder, SceneState};
//!
//! let scene = SceneState::default();
//! let mut recorder = FrameRecorder::new();
//! scene.render(0.5, &mut recorder);
//! assert_eq!(recorder.labels()[0], "skybox");
//!
//! let pose = AnimationClock::default().sample(0.0, true);
//! assert_eq!(pose.tail_wag, 0.0);
//! ```
//!
//! Building a part the way the rigs do:
//!
//! ```
//! use paddock::{ParentBasis, Transform, Vec3};
//!
//! let shoulder = ParentBasis::root(Transform::new()).joint().translate(0.0, 1.0, 0.0);
//! let child = shoulder.basis();
//! let limb = shoulder.scale(0.1, 0.5, 0.1).translate(-0.5, -1.0, -0.5);
//!
//! let foot = limb.transform().transform_point(Vec3::new(0.5, 0.0, 0.5));
//! assert!(foot.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-6));
//! assert_eq!(child.transform().transform_point(Vec3::ZERO), Vec3::Y);
//! ```

mod animation;
mod app;
mod camera;
mod config;
mod cube_pass;
mod error;
mod gpu;
mod input;
mod material;
mod mesh;
mod primitive;
pub mod rig;
mod scene;
mod texture;
mod transform;

pub use animation::{AnimationClock, AnimationParams, AnimationState, Signal};
pub use app::{Stopwatch, run};
pub use camera::Camera;
pub use config::{
    AnimationConfig, CameraConfig, ControlsConfig, LayoutConfig, SceneConfig, TextureConfig,
    WindowConfig,
};
pub use cube_pass::CubePass;
pub use error::{PaddockError, Result};
pub use gpu::GpuContext;
pub use input::{CameraCommand, Input, PointerPan, UiCommand};
pub use material::{Color, Material};
pub use mesh::{
    CUBE_VERTEX_COUNT, CubeMesh, FastVertex, Vertex3d, detailed_cube_vertices,
    fast_cube_vertices,
};
pub use primitive::{CubeVariant, FrameRecorder, FrameUniforms, Primitive, RenderTarget};
pub use scene::{FrameContext, SceneComposer, SceneState};
pub use texture::{Texture, grass_pixels, sky_pixels};
pub use transform::{Joint, ParentBasis, ScaledPart, Transform};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3, Vec4};
