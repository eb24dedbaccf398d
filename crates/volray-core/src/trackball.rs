//! Virtual trackball turning pointer drags into rotations.

use glam::{Quat, Vec2, Vec3};

/// Converts a pixel position to view coordinates in `[-1, 1]²`, y up.
#[must_use]
pub fn pixel_to_view(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(2.0 * x / width - 1.0, 1.0 - 2.0 * y / height)
}

/// Lifts a view-space point onto the unit sphere, or onto its silhouette
/// when it lies outside.
fn project_to_sphere(p: Vec2) -> Vec3 {
    let point = p.extend(0.0);
    let z_squared = 1.0 - point.length_squared();
    if z_squared > 0.0 {
        Vec3::new(point.x, point.y, z_squared.sqrt())
    } else {
        point.normalize_or_zero()
    }
}

/// Sphere trackball accumulating a rotation while the pointer is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBall {
    rotation: Quat,
    last_position: Vec2,
    pressed: bool,
}

impl Default for TrackBall {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            last_position: Vec2::ZERO,
            pressed: false,
        }
    }
}

impl TrackBall {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated rotation.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Starts a drag at `position` (view coordinates).
    pub fn push(&mut self, position: Vec2, _transformation: Quat) {
        self.last_position = position;
        self.pressed = true;
    }

    /// Continues a drag. The rotation axis is expressed in the frame given
    /// by `transformation`. Ignored while not pressed.
    pub fn move_to(&mut self, position: Vec2, transformation: Quat) {
        if !self.pressed {
            return;
        }

        let from = project_to_sphere(self.last_position);
        let to = project_to_sphere(position);
        let axis = from.cross(to);
        let sin_angle = axis.length().min(1.0);
        if sin_angle > f32::EPSILON {
            let axis = (transformation * axis).normalize();
            let delta = Quat::from_axis_angle(axis, sin_angle.asin());
            self.rotation = (delta * self.rotation).normalize();
        }
        self.last_position = position;
    }

    /// Ends a drag after applying the final movement.
    pub fn release(&mut self, position: Vec2, transformation: Quat) {
        self.move_to(position, transformation);
        self.pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_view() {
        assert_eq!(pixel_to_view(0.0, 0.0, 200.0, 100.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_view(100.0, 50.0, 200.0, 100.0), Vec2::ZERO);
        assert_eq!(pixel_to_view(200.0, 100.0, 200.0, 100.0), Vec2::new(1.0, -1.0));
        assert_eq!(pixel_to_view(5.0, 5.0, 0.0, 100.0), Vec2::ZERO);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut ball = TrackBall::new();
        ball.move_to(Vec2::new(0.5, 0.0), Quat::IDENTITY);
        assert_eq!(ball.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_horizontal_drag_rotates_about_y() {
        let mut ball = TrackBall::new();
        ball.push(Vec2::ZERO, Quat::IDENTITY);
        ball.release(Vec2::new(0.5, 0.0), Quat::IDENTITY);
        assert!(!ball.is_pressed());

        let (axis, angle) = ball.rotation().to_axis_angle();
        assert!(axis.abs_diff_eq(Vec3::Y, 1e-5));
        assert!((angle - 0.5f32.asin()).abs() < 1e-5);
    }

    #[test]
    fn test_transformation_rotates_axis() {
        let mut ball = TrackBall::new();
        let quarter_turn = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        ball.push(Vec2::ZERO, quarter_turn);
        ball.move_to(Vec2::new(0.5, 0.0), quarter_turn);

        let (axis, _) = ball.rotation().to_axis_angle();
        assert!(axis.abs_diff_eq(Vec3::NEG_X, 1e-5));
    }

    #[test]
    fn test_drags_accumulate() {
        let mut ball = TrackBall::new();
        ball.push(Vec2::ZERO, Quat::IDENTITY);
        ball.move_to(Vec2::new(0.3, 0.0), Quat::IDENTITY);
        let first = ball.rotation();
        ball.move_to(Vec2::new(0.6, 0.0), Quat::IDENTITY);
        assert_ne!(ball.rotation(), first);
        assert!(ball.rotation().is_normalized());
    }
}
