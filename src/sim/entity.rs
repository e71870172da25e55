//! Shared movable-body base for all entities
//!
//! Every entity (player, obstacle, collectible) composes a [`Body`] instead of
//! inheriting behavior. Collision boxes are always derived from the current
//! position so they can never desync from it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box, half-open on both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Strict overlap test: boxes that merely touch do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

/// Position, size, velocity and lifecycle flags shared by every entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner (y grows downward)
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Downward acceleration; zero for entities that do not fall
    pub gravity: f32,
    /// Eligible for update and collision; false schedules removal
    pub active: bool,
    /// Render-only flag, independent of `active` (invincibility flicker)
    pub visible: bool,
    /// Collision box inset on every side
    hitbox_inset: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, hitbox_inset: f32) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            gravity: 0.0,
            active: true,
            visible: true,
            hitbox_inset,
        }
    }

    /// Integrate one timestep: gravity into velocity, velocity into position.
    /// No-op while inactive.
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        if self.gravity != 0.0 {
            self.vel.y += self.gravity * dt;
        }
        self.pos += self.vel * dt;
    }

    /// Collision box, derived from the current position
    pub fn hitbox(&self) -> Aabb {
        let inset = self.hitbox_inset.min(self.size.min_element() / 2.0);
        Aabb::new(
            self.pos + Vec2::splat(inset),
            self.size - Vec2::splat(inset * 2.0),
        )
    }

    /// True iff both bodies are active and their hitboxes overlap
    pub fn collides_with(&self, other: &Body) -> bool {
        self.active && other.active && self.hitbox().overlaps(&other.hitbox())
    }

    /// Right edge has scrolled past the left screen boundary
    pub fn off_screen_left(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32, y: f32, w: f32, h: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(w, h), 0.0)
    }

    #[test]
    fn test_overlap_symmetric() {
        let a = body_at(0.0, 0.0, 10.0, 10.0);
        let b = body_at(5.0, 5.0, 10.0, 10.0);
        assert!(a.collides_with(&b));
        assert!(b.collides_with(&a));

        let c = body_at(100.0, 100.0, 10.0, 10.0);
        assert_eq!(a.collides_with(&c), c.collides_with(&a));
        assert!(!a.collides_with(&c));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = body_at(0.0, 0.0, 10.0, 10.0);
        // Shares the x=10 edge exactly
        let b = body_at(10.0, 0.0, 10.0, 10.0);
        assert!(!a.collides_with(&b));
        // Shares the y=10 edge exactly
        let c = body_at(0.0, 10.0, 10.0, 10.0);
        assert!(!a.collides_with(&c));
    }

    #[test]
    fn test_inactive_never_collides() {
        let a = body_at(0.0, 0.0, 10.0, 10.0);
        let mut b = body_at(5.0, 5.0, 10.0, 10.0);
        b.active = false;
        assert!(!a.collides_with(&b));
        assert!(!b.collides_with(&a));
    }

    #[test]
    fn test_update_integrates_velocity_and_gravity() {
        let mut b = body_at(0.0, 0.0, 10.0, 10.0);
        b.vel = Vec2::new(100.0, 0.0);
        b.gravity = 1000.0;
        b.update(0.1);
        assert!((b.pos.x - 10.0).abs() < 1e-4);
        // Gravity applied before integration
        assert!((b.vel.y - 100.0).abs() < 1e-4);
        assert!((b.pos.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_update_noop_while_inactive() {
        let mut b = body_at(0.0, 0.0, 10.0, 10.0);
        b.vel = Vec2::new(100.0, 0.0);
        b.active = false;
        b.update(1.0);
        assert_eq!(b.pos, Vec2::ZERO);
    }

    #[test]
    fn test_hitbox_derived_with_inset() {
        let mut b = Body::new(Vec2::ZERO, Vec2::new(20.0, 20.0), 4.0);
        let hb = b.hitbox();
        assert_eq!(hb.pos, Vec2::splat(4.0));
        assert_eq!(hb.size, Vec2::splat(12.0));

        // Hitbox follows the body; there is no way to move it independently
        b.pos = Vec2::new(50.0, 0.0);
        assert_eq!(b.hitbox().pos, Vec2::new(54.0, 4.0));
    }

    #[test]
    fn test_off_screen_left() {
        let mut b = body_at(-11.0, 0.0, 10.0, 10.0);
        assert!(b.off_screen_left());
        b.pos.x = -5.0;
        assert!(!b.off_screen_left());
    }
}
