/// Minimal 2D vector for the scene simulation. Kept UI-free so the
/// simulation can be tested without egui types.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_angle(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self { x: c, y: s }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Linear interpolation toward `other` by factor `t`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Heading angle from `self` to `other`, in radians.
    pub fn heading_to(self, other: Self) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Canvas extent used for spawn bounds and toroidal wrap.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Toroidal wrap: a coordinate past one edge snaps to the opposite
    /// edge (0 or max), never reflected or clamped.
    pub fn wrap(&self, pos: &mut Vec2) {
        if pos.x > self.width {
            pos.x = 0.0;
        }
        if pos.x < 0.0 {
            pos.x = self.width;
        }
        if pos.y > self.height {
            pos.y = 0.0;
        }
        if pos.y < 0.0 {
            pos.y = self.height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_moves_toward_target() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, -10.0);
        let m = a.lerp(b, 0.05);
        assert!((m.x - 0.5).abs() < 1e-6);
        assert!((m.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn wrap_snaps_to_opposite_edge() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut p = Vec2::new(805.0, 300.0);
        bounds.wrap(&mut p);
        assert_eq!(p.x, 0.0);

        let mut p = Vec2::new(-3.0, 300.0);
        bounds.wrap(&mut p);
        assert_eq!(p.x, 800.0);

        let mut p = Vec2::new(400.0, 601.0);
        bounds.wrap(&mut p);
        assert_eq!(p.y, 0.0);

        let mut p = Vec2::new(400.0, -0.5);
        bounds.wrap(&mut p);
        assert_eq!(p.y, 600.0);
    }

    #[test]
    fn heading_matches_axes() {
        let o = Vec2::ZERO;
        assert!((o.heading_to(Vec2::new(1.0, 0.0))).abs() < 1e-6);
        let up = o.heading_to(Vec2::new(0.0, 1.0));
        assert!((up - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
