use glam::Vec2;
use rift_core::geom::Rect;

/// Frame-rate the follow smoothing is tuned against.
const SMOOTHING_REFERENCE_FPS: f32 = 60.0;

/// Side-scrolling camera. `offset` is the world position of the viewport's
/// top-left corner; world-space draws subtract it via [`Camera::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    pub viewport: (u32, u32),
    /// Fraction of the remaining distance covered per 1/60 s.
    pub smoothing: f32,
}

impl Camera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport: (viewport_width, viewport_height),
            smoothing: 0.08,
        }
    }

    fn half_viewport(&self) -> Vec2 {
        Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32) * 0.5
    }

    /// Center on `target` immediately.
    pub fn snap_to(&mut self, target: Rect) {
        self.offset = target.center() - self.half_viewport();
    }

    /// Ease toward centering `target`. A zero `dt` leaves the camera untouched.
    pub fn adjust_to(&mut self, dt: f32, target: Rect) {
        let desired = target.center() - self.half_viewport();
        let t = (self.smoothing * dt * SMOOTHING_REFERENCE_FPS).clamp(0.0, 1.0);
        self.offset += (desired - self.offset) * t;
    }

    /// World position to screen position.
    pub fn apply(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    pub fn apply_rect(&self, rect: Rect) -> Rect {
        rect.translate(-self.offset)
    }

    /// Visible world area.
    pub fn view_rect(&self) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.viewport.0 as f32,
            self.viewport.1 as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_centers_target() {
        let mut camera = Camera::new(400, 230);
        camera.snap_to(Rect::from_center(Vec2::new(500.0, 300.0), 10.0, 10.0));
        assert_eq!(camera.offset, Vec2::new(300.0, 185.0));
        assert_eq!(camera.apply(Vec2::new(500.0, 300.0)), Vec2::new(200.0, 115.0));
    }

    #[test]
    fn adjust_with_zero_dt_is_a_no_op() {
        let mut camera = Camera::new(400, 230);
        camera.adjust_to(0.0, Rect::new(1000.0, 1000.0, 10.0, 10.0));
        assert_eq!(camera.offset, Vec2::ZERO);
    }

    #[test]
    fn adjust_converges_without_overshoot() {
        let mut camera = Camera::new(400, 230);
        let target = Rect::from_center(Vec2::new(800.0, 115.0), 10.0, 10.0);
        let mut last_distance = f32::MAX;
        for _ in 0..240 {
            camera.adjust_to(1.0 / 60.0, target);
            let distance = (camera.offset - Vec2::new(600.0, 0.0)).length();
            assert!(distance <= last_distance);
            last_distance = distance;
        }
        assert!(last_distance < 1.0);
    }

    #[test]
    fn huge_dt_clamps_to_target() {
        let mut camera = Camera::new(400, 230);
        let target = Rect::from_center(Vec2::new(200.0, 115.0), 2.0, 2.0);
        camera.offset = Vec2::new(-50.0, -50.0);
        camera.adjust_to(10.0, target);
        assert_eq!(camera.offset, Vec2::ZERO);
        assert_eq!(camera.view_rect(), Rect::new(0.0, 0.0, 400.0, 230.0));
    }
}
