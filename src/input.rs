use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, KeyCode, PhysicalKey};

use crate::config::ControlsConfig;
use crate::scene::SceneState;

/// A discrete camera move bound to a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraCommand {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    PanLeft,
    PanRight,
    Up,
    Down,
}

impl CameraCommand {
    /// W/S forward/back, A/D strafe, Q/E pan, U/Z up/down. Case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Self::Forward),
            's' => Some(Self::Back),
            'a' => Some(Self::StrafeLeft),
            'd' => Some(Self::StrafeRight),
            'q' => Some(Self::PanLeft),
            'e' => Some(Self::PanRight),
            'u' => Some(Self::Up),
            'z' => Some(Self::Down),
            _ => None,
        }
    }

    /// The same bindings by physical key position.
    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(Self::Forward),
            KeyCode::KeyS => Some(Self::Back),
            KeyCode::KeyA => Some(Self::StrafeLeft),
            KeyCode::KeyD => Some(Self::StrafeRight),
            KeyCode::KeyQ => Some(Self::PanLeft),
            KeyCode::KeyE => Some(Self::PanRight),
            KeyCode::KeyU => Some(Self::Up),
            KeyCode::KeyZ => Some(Self::Down),
            _ => None,
        }
    }

    /// Resolves a key press by the character the layout produces. The
    /// physical position is used only for keys that produce no character.
    pub fn from_key(logical: &Key, physical: PhysicalKey) -> Option<Self> {
        resolve_key(logical, physical, Self::from_char, Self::from_key_code)
    }

    pub fn apply(self, scene: &mut SceneState) -> bool {
        match self {
            Self::Forward => scene.on_forward(),
            Self::Back => scene.on_back(),
            Self::StrafeLeft => scene.on_strafe_left(),
            Self::StrafeRight => scene.on_strafe_right(),
            Self::PanLeft => scene.on_pan_left(),
            Self::PanRight => scene.on_pan_right(),
            Self::Up => scene.on_up(),
            Self::Down => scene.on_down(),
        }
    }
}

/// Keys standing in for the animation buttons and the rotation slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    ToggleAnimation,
    RotateLeft,
    RotateRight,
}

impl UiCommand {
    /// P toggles the animation, `[` and `]` step the rotation.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Self::ToggleAnimation),
            '[' => Some(Self::RotateLeft),
            ']' => Some(Self::RotateRight),
            _ => None,
        }
    }

    pub fn from_key(logical: &Key, physical: PhysicalKey) -> Option<Self> {
        resolve_key(logical, physical, Self::from_char, Self::from_key_code)
    }

    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyP => Some(Self::ToggleAnimation),
            KeyCode::BracketLeft => Some(Self::RotateLeft),
            KeyCode::BracketRight => Some(Self::RotateRight),
            _ => None,
        }
    }

    pub fn apply(self, scene: &mut SceneState, rotation_step: f32) -> bool {
        match self {
            Self::ToggleAnimation => {
                let enabled = !scene.animation_enabled();
                scene.set_animation_enabled(enabled)
            }
            Self::RotateLeft => {
                let degrees = scene.global_rotation() - rotation_step;
                scene.set_global_rotation(degrees)
            }
            Self::RotateRight => {
                let degrees = scene.global_rotation() + rotation_step;
                scene.set_global_rotation(degrees)
            }
        }
    }
}

/// Converts horizontal cursor movement into pan angles.
#[derive(Clone, Debug)]
pub struct PointerPan {
    last_x: Option<f32>,
    /// Degrees of pan for a sweep across half the window.
    scale: f32,
}

impl PointerPan {
    pub fn new(scale: f32) -> Self {
        Self { last_x: None, scale }
    }

    /// Degrees to pan for a cursor now at `x` in a window `width` pixels wide.
    /// Positive pans right. The first position after [`reset`](Self::reset)
    /// only records where the cursor is.
    pub fn degrees(&mut self, x: f32, width: f32) -> f32 {
        let previous = self.last_x.replace(x);
        match previous {
            Some(last) if width > 0.0 => (x - last) / (width * 0.5) * self.scale,
            _ => 0.0,
        }
    }

    /// Forgets the last cursor position, for when it leaves the window.
    pub fn reset(&mut self) {
        self.last_x = None;
    }
}

/// Routes window events to a [`SceneState`].
#[derive(Clone, Debug)]
pub struct Input {
    pointer: PointerPan,
    rotation_step: f32,
}

impl Default for Input {
    fn default() -> Self {
        Self::new(&ControlsConfig::default())
    }
}

impl Input {
    pub fn new(controls: &ControlsConfig) -> Self {
        Self {
            pointer: PointerPan::new(controls.pointer_pan_scale),
            rotation_step: controls.rotation_step,
        }
    }

    /// Applies one window event. Returns true when the scene should be redrawn
    /// right away.
    pub fn handle_event(&mut self, event: &WindowEvent, width: u32, scene: &mut SceneState) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event, scene),
            WindowEvent::CursorMoved { position, .. } => {
                let degrees = self.pointer.degrees(position.x as f32, width as f32);
                scene.on_pan_pointer(degrees)
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.reset();
                false
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, event: &KeyEvent, scene: &mut SceneState) -> bool {
        if event.state != ElementState::Pressed {
            return false;
        }
        let (logical, physical) = (&event.logical_key, event.physical_key);

        if let Some(command) = CameraCommand::from_key(logical, physical) {
            log::debug!("camera {command:?}");
            return command.apply(scene);
        }
        // Held keys repeat camera moves, but a held P should not flicker.
        match UiCommand::from_key(logical, physical) {
            Some(command) if !event.repeat => command.apply(scene, self.rotation_step),
            _ => false,
        }
    }
}

fn resolve_key<T>(
    logical: &Key,
    physical: PhysicalKey,
    by_char: fn(char) -> Option<T>,
    by_code: fn(KeyCode) -> Option<T>,
) -> Option<T> {
    match (logical, physical) {
        (Key::Character(text), _) => text.chars().next().and_then(by_char),
        (_, PhysicalKey::Code(code)) => by_code(code),
        _ => None,
    }
}
