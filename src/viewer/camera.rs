//! Orbit camera for the event viewer.

use glam::{Mat4, Vec3};

use crate::config::Projection;
use crate::layout::CameraLayout;

/// Scene-box units per unit of layout eye distance.
const EYE_DISTANCE_SCALE: f32 = 2.0;

/// Pitch limit, short of the poles where the view matrix degenerates.
pub const MAX_PITCH: f32 = 1.5;

const MIN_DISTANCE: f32 = 0.2;
const MAX_DISTANCE: f32 = 20.0;
const FOV_Y_DEGREES: f32 = 45.0;
const Z_NEAR: f32 = 0.01;
const Z_FAR: f32 = 100.0;

/// Orbit camera around the scene box.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    pub projection: Projection,
}

impl OrbitCamera {
    /// Camera placed at the layout's eye, looking at its centre.
    pub fn from_layout(layout: &CameraLayout) -> Self {
        let eye = Vec3::new(layout.eye[0] as f32, layout.eye[1] as f32, layout.eye[2] as f32);
        let target = Vec3::new(
            layout.center[0] as f32,
            layout.center[1] as f32,
            layout.center[2] as f32,
        );
        let offset = eye - target;
        let length = offset.length();

        let (yaw, pitch) = if length > 0.0 {
            let dir = offset / length;
            (dir.x.atan2(dir.z), dir.y.clamp(-1.0, 1.0).asin())
        } else {
            (0.0, 0.0)
        };

        Self {
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            distance: (length * EYE_DISTANCE_SCALE).clamp(MIN_DISTANCE, MAX_DISTANCE),
            target,
            projection: layout.projection,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Projection matrix for a viewport of the given aspect ratio.
    ///
    /// The orthographic view is sized to match what the perspective view shows
    /// at the target distance, so toggling keeps the scene framed.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let fov = FOV_Y_DEGREES.to_radians();
        match self.projection {
            Projection::Perspective => Mat4::perspective_rh(fov, aspect, Z_NEAR, Z_FAR),
            Projection::Orthographic => {
                let half_h = self.distance * (fov * 0.5).tan();
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, Z_NEAR, Z_FAR)
            }
        }
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Rotate by a mouse drag of `dx`, `dy` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move towards (positive) or away from the target.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * 0.3).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn toggle_projection(&mut self) {
        self.projection = self.projection.toggled();
    }
}
