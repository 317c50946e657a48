// First-person viewing camera

use glam::{Mat4, Vec3};

const HOME_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);
const HOME_YAW_DEG: f32 = -90.0;
const PITCH_LIMIT_DEG: f32 = 89.0;

/// Keyboard motions available while camera control is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMove {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// A free-flying camera driven by discrete key presses and mouse drags.
///
/// Yaw and pitch are kept in degrees; yaw -90 looks down -Z.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    front: Vec3,
    pub up: Vec3,
    yaw_deg: f32,
    pitch_deg: f32,
    speed: f32,
    sensitivity: f32,
}

impl FirstPersonCamera {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            position: HOME_POSITION,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            yaw_deg: HOME_YAW_DEG,
            pitch_deg: 0.0,
            speed,
            sensitivity,
        }
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn yaw_pitch(&self) -> (f32, f32) {
        (self.yaw_deg, self.pitch_deg)
    }

    pub fn step(&mut self, motion: CameraMove) {
        let right = self.front.cross(self.up).normalize_or_zero();
        let delta = match motion {
            CameraMove::Forward => self.front,
            CameraMove::Backward => -self.front,
            CameraMove::Left => -right,
            CameraMove::Right => right,
            CameraMove::Up => Vec3::Y,
            CameraMove::Down => Vec3::NEG_Y,
        };
        self.position += delta * self.speed;
    }

    /// Turn by a mouse delta in pixels. `dy` is positive when the cursor
    /// moves up the screen.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw_deg += dx * self.sensitivity;
        self.pitch_deg =
            (self.pitch_deg + dy * self.sensitivity).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);

        let (yaw, pitch) = (self.yaw_deg.to_radians(), self.pitch_deg.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
    }

    /// Return to the start-up pose.
    pub fn reset(&mut self) {
        *self = Self::new(self.speed, self.sensitivity);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }
}
