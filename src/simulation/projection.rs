//! Perspective camera math for placing screen-space station labels
//!
//! Mirrors a right-handed, -Z-forward perspective camera: NDC x/y in
//! [-1, 1], and NDC z < 1 for points in front of the camera and closer
//! than the far plane.

use super::types::Position;

/// Camera follow rate towards the train per frame
pub const FOLLOW_RATE: f32 = 0.05;

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Position,
    pub target: Position,
    pub up: Position,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn looking_at(eye: Position, target: Position) -> Self {
        Self {
            eye,
            target,
            up: Position::new(0.0, 1.0, 0.0),
            fov_y: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Project a world point to normalized device coordinates.
    /// Returns `None` for points on the camera plane.
    pub fn project(&self, point: Position, aspect: f32) -> Option<Position> {
        let forward = (self.target - self.eye).normalized();
        let right = forward.cross(&self.up).normalized();
        let up = right.cross(&forward);

        let rel = point - self.eye;
        let eye_x = right.dot(&rel);
        let eye_y = up.dot(&rel);
        let eye_z = -forward.dot(&rel);

        let w = -eye_z;
        if w.abs() < f32::EPSILON {
            return None;
        }

        let focal = 1.0 / (self.fov_y.to_radians() / 2.0).tan();
        let depth_a = -(self.far + self.near) / (self.far - self.near);
        let depth_b = -2.0 * self.far * self.near / (self.far - self.near);

        Some(Position::new(
            focal / aspect * eye_x / w,
            focal * eye_y / w,
            (depth_a * eye_z + depth_b) / w,
        ))
    }

    /// Project a world point to pixel coordinates. `None` when the point is
    /// behind the camera or beyond the far plane.
    pub fn to_screen(&self, point: Position, viewport: Viewport) -> Option<(f32, f32)> {
        let ndc = self.project(point, viewport.aspect())?;
        if ndc.z >= 1.0 {
            return None;
        }
        Some((
            (ndc.x * 0.5 + 0.5) * viewport.width,
            (-(ndc.y * 0.5) + 0.5) * viewport.height,
        ))
    }
}

/// Chase camera that trails the train along the track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub camera: Camera,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            camera: Camera::looking_at(Position::new(0.0, 6.0, 12.0), Position::default()),
        }
    }
}

impl CameraRig {
    /// Ease the camera towards the train and aim at it
    pub fn follow(&mut self, train_x: f32) {
        self.camera.eye.x += (train_x - self.camera.eye.x) * FOLLOW_RATE;
        self.camera.target = Position::new(train_x, 0.0, 0.0);
    }
}
