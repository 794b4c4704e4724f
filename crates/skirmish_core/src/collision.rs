//! Collision resolution for unit movement.
//!
//! Units submit a desired next position each tick and get back a
//! conflict-resolved one. Resolution is axis-sliding: when the full
//! move collides, each axis is tried on its own so a unit slides along
//! an obstacle edge instead of sticking to it. When even that leaves
//! the unit pinned in place while it still has somewhere to go, the
//! orchestrator asks for an avoidance direction that routes around the
//! obstruction.

use serde::{Deserialize, Serialize};

use crate::math::{Bounds, Vec2};

/// Rotation offsets probed by avoidance steering, nearest first.
const AVOIDANCE_ANGLES: [f32; 6] = [
    std::f32::consts::FRAC_PI_4,
    -std::f32::consts::FRAC_PI_4,
    std::f32::consts::FRAC_PI_2,
    -std::f32::consts::FRAC_PI_2,
    2.35619449,
    -2.35619449,
];

/// Movement conflict resolver for one terrain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionWorld {
    terrain: Bounds,
}

impl CollisionWorld {
    /// Create a resolver for the given playable area.
    #[must_use]
    pub const fn new(terrain: Bounds) -> Self {
        Self { terrain }
    }

    /// Replace the playable area.
    pub fn set_terrain(&mut self, terrain: Bounds) {
        self.terrain = terrain;
    }

    /// The playable area.
    #[must_use]
    pub const fn terrain(&self) -> &Bounds {
        &self.terrain
    }

    /// Clamp a center position so `size` stays inside the terrain.
    #[must_use]
    fn clamp_to_terrain(&self, pos: Vec2, size: Vec2) -> Vec2 {
        let half = size.scale(0.5);
        Vec2::new(
            pos.x.clamp(self.terrain.x + half.x, self.terrain.x + self.terrain.w - half.x),
            pos.y.clamp(self.terrain.y + half.y, self.terrain.y + self.terrain.h - half.y),
        )
    }

    fn blocked(pos: Vec2, size: Vec2, obstacles: &[Bounds]) -> bool {
        let moved = Bounds::centered(pos, size);
        obstacles.iter().any(|o| moved.intersects(o))
    }

    /// Resolve a desired move against a set of obstacle boxes.
    ///
    /// Tries the full move, then each axis alone, then stays put. The
    /// current position of the moving unit must not be in `obstacles`.
    #[must_use]
    pub fn resolve_movement(&self, current: &Bounds, desired: Vec2, obstacles: &[Bounds]) -> Vec2 {
        let size = Vec2::new(current.w, current.h);
        let from = current.center();
        let desired = self.clamp_to_terrain(desired, size);

        if !Self::blocked(desired, size, obstacles) {
            return desired;
        }
        let x_only = Vec2::new(desired.x, from.y);
        if !Self::blocked(x_only, size, obstacles) {
            return x_only;
        }
        let y_only = Vec2::new(from.x, desired.y);
        if !Self::blocked(y_only, size, obstacles) {
            return y_only;
        }
        from
    }

    /// Find a sidestep position toward `target` around obstructions.
    ///
    /// Probes rotated headings nearest-first and returns the first
    /// unblocked step; falls back to the current position when boxed
    /// in on every side.
    #[must_use]
    pub fn avoidance_direction(
        &self,
        current: &Bounds,
        target: Vec2,
        step: f32,
        obstacles: &[Bounds],
    ) -> Vec2 {
        let size = Vec2::new(current.w, current.h);
        let from = current.center();
        let dir = (target - from).normalize_or_zero();
        if dir == Vec2::ZERO {
            return from;
        }

        for angle in AVOIDANCE_ANGLES {
            let probe = self.clamp_to_terrain(from + dir.rotated(angle).scale(step), size);
            if !Self::blocked(probe, size, obstacles) && probe.distance_squared(from) > 1e-6 {
                return probe;
            }
        }
        from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> CollisionWorld {
        CollisionWorld::new(Bounds::new(0.0, 0.0, 1000.0, 1000.0))
    }

    fn unit_at(pos: Vec2) -> Bounds {
        Bounds::centered(pos, Vec2::new(16.0, 16.0))
    }

    #[test]
    fn test_unobstructed_move_passes_through() {
        let w = world();
        let resolved = w.resolve_movement(&unit_at(Vec2::new(100.0, 100.0)), Vec2::new(110.0, 105.0), &[]);
        assert_eq!(resolved, Vec2::new(110.0, 105.0));
    }

    #[test]
    fn test_slides_along_obstacle_edge() {
        let w = world();
        // Wall directly to the right; a diagonal move keeps its y
        // component and gives up the x component.
        let wall = Bounds::centered(Vec2::new(124.0, 100.0), Vec2::new(16.0, 200.0));
        let resolved = w.resolve_movement(
            &unit_at(Vec2::new(100.0, 100.0)),
            Vec2::new(112.0, 112.0),
            &[wall],
        );
        assert_eq!(resolved, Vec2::new(100.0, 112.0));
    }

    #[test]
    fn test_fully_blocked_move_stays_put() {
        let w = world();
        let boxed = [
            Bounds::centered(Vec2::new(120.0, 100.0), Vec2::new(16.0, 16.0)),
            Bounds::centered(Vec2::new(100.0, 120.0), Vec2::new(16.0, 16.0)),
            Bounds::centered(Vec2::new(120.0, 120.0), Vec2::new(16.0, 16.0)),
        ];
        let resolved = w.resolve_movement(
            &unit_at(Vec2::new(100.0, 100.0)),
            Vec2::new(110.0, 110.0),
            &boxed,
        );
        assert_eq!(resolved, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_terrain_clamp() {
        let w = world();
        let resolved = w.resolve_movement(&unit_at(Vec2::new(10.0, 10.0)), Vec2::new(-50.0, 5.0), &[]);
        assert_eq!(resolved, Vec2::new(8.0, 8.0));
    }

    #[test]
    fn test_avoidance_steps_around_a_wall() {
        let w = world();
        let wall = Bounds::centered(Vec2::new(130.0, 100.0), Vec2::new(16.0, 64.0));
        let current = unit_at(Vec2::new(100.0, 100.0));

        let probe = w.avoidance_direction(&current, Vec2::new(200.0, 100.0), 10.0, &[wall]);
        assert_ne!(probe, current.center());
        // The sidestep leaves the straight line toward the target.
        assert!(probe.y != 100.0);
    }

    #[test]
    fn test_avoidance_boxed_in_stays_put() {
        let w = world();
        // Obstacles on every probed heading.
        let ring: Vec<Bounds> = (0..12)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / 12.0;
                Bounds::centered(
                    Vec2::new(100.0, 100.0) + Vec2::from_angle(angle).scale(14.0),
                    Vec2::new(20.0, 20.0),
                )
            })
            .collect();
        let current = unit_at(Vec2::new(100.0, 100.0));
        let probe = w.avoidance_direction(&current, Vec2::new(300.0, 100.0), 10.0, &ring);
        assert_eq!(probe, current.center());
    }
}
