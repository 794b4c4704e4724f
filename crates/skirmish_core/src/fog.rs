//! Fog of war: a tile grid tracking what the player has seen.
//!
//! Each tick the orchestrator rolls currently visible tiles back to
//! explored, then reveals a circle around every friendly entity.
//! Explored tiles stay explored for the rest of the match; only the
//! visible ring is transient.

use serde::{Deserialize, Serialize};

use crate::math::{Bounds, Vec2};

/// Visibility state of one fog tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileVisibility {
    /// Never seen.
    Unexplored,
    /// Seen before, not currently in sight range.
    Explored,
    /// Currently in sight range of a friendly entity.
    Visible,
}

/// Fog-of-war grid covering the terrain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FogOfWar {
    origin: Vec2,
    tile_size: f32,
    cols: usize,
    rows: usize,
    tiles: Vec<TileVisibility>,
}

impl FogOfWar {
    /// Create an all-unexplored grid covering `terrain`.
    #[must_use]
    pub fn new(terrain: Bounds, tile_size: f32) -> Self {
        let cols = (terrain.w / tile_size).ceil().max(1.0) as usize;
        let rows = (terrain.h / tile_size).ceil().max(1.0) as usize;
        Self {
            origin: Vec2::new(terrain.x, terrain.y),
            tile_size,
            cols,
            rows,
            tiles: vec![TileVisibility::Unexplored; cols * rows],
        }
    }

    fn tile_index(&self, x: f32, y: f32) -> Option<usize> {
        let col = ((x - self.origin.x) / self.tile_size).floor();
        let row = ((y - self.origin.y) / self.tile_size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// Roll visible tiles back to explored. Explored tiles are kept;
    /// this is not a full reset.
    pub fn clear_visibility(&mut self) {
        for tile in &mut self.tiles {
            if *tile == TileVisibility::Visible {
                *tile = TileVisibility::Explored;
            }
        }
    }

    /// Mark every tile whose center lies within `radius` of the point
    /// as visible.
    pub fn reveal_circle(&mut self, center: Vec2, radius: f32) {
        let radius_sq = radius * radius;
        let min_col = (((center.x - radius - self.origin.x) / self.tile_size).floor()).max(0.0) as usize;
        let min_row = (((center.y - radius - self.origin.y) / self.tile_size).floor()).max(0.0) as usize;
        let max_col = ((((center.x + radius - self.origin.x) / self.tile_size).ceil()) as usize).min(self.cols);
        let max_row = ((((center.y + radius - self.origin.y) / self.tile_size).ceil()) as usize).min(self.rows);

        for row in min_row..max_row {
            for col in min_col..max_col {
                let tile_center = Vec2::new(
                    self.origin.x + (col as f32 + 0.5) * self.tile_size,
                    self.origin.y + (row as f32 + 0.5) * self.tile_size,
                );
                if tile_center.distance_squared(center) <= radius_sq {
                    self.tiles[row * self.cols + col] = TileVisibility::Visible;
                }
            }
        }
    }

    /// Whether any tile overlapping the bounds is currently visible.
    #[must_use]
    pub fn is_visible(&self, bounds: &Bounds) -> bool {
        let step = self.tile_size;
        let mut y = bounds.y;
        while y <= bounds.y + bounds.h {
            let mut x = bounds.x;
            while x <= bounds.x + bounds.w {
                if self.tile_state_at(x, y) == TileVisibility::Visible {
                    return true;
                }
                x += step;
            }
            y += step;
        }
        false
    }

    /// Visibility state of the tile containing a world point.
    /// Off-grid points read as unexplored.
    #[must_use]
    pub fn tile_state_at(&self, x: f32, y: f32) -> TileVisibility {
        self.tile_index(x, y)
            .map_or(TileVisibility::Unexplored, |i| self.tiles[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fog() -> FogOfWar {
        FogOfWar::new(Bounds::new(0.0, 0.0, 640.0, 640.0), 32.0)
    }

    #[test]
    fn test_starts_unexplored() {
        let f = fog();
        assert_eq!(f.tile_state_at(100.0, 100.0), TileVisibility::Unexplored);
        assert_eq!(f.tile_state_at(-5.0, 10.0), TileVisibility::Unexplored);
    }

    #[test]
    fn test_reveal_then_clear_leaves_explored() {
        let mut f = fog();
        f.reveal_circle(Vec2::new(100.0, 100.0), 64.0);
        assert_eq!(f.tile_state_at(100.0, 100.0), TileVisibility::Visible);

        f.clear_visibility();
        assert_eq!(f.tile_state_at(100.0, 100.0), TileVisibility::Explored);
        // Never-seen tiles are untouched.
        assert_eq!(f.tile_state_at(500.0, 500.0), TileVisibility::Unexplored);
    }

    #[test]
    fn test_reveal_is_circular_not_square() {
        let mut f = fog();
        f.reveal_circle(Vec2::new(320.0, 320.0), 64.0);
        assert_eq!(f.tile_state_at(320.0, 320.0), TileVisibility::Visible);
        // The square corner at ~(r, r) offset lies outside the circle.
        assert_eq!(f.tile_state_at(320.0 + 60.0, 320.0 + 60.0), TileVisibility::Unexplored);
    }

    #[test]
    fn test_is_visible_over_bounds() {
        let mut f = fog();
        f.reveal_circle(Vec2::new(100.0, 100.0), 64.0);

        let near = Bounds::centered(Vec2::new(120.0, 100.0), Vec2::new(16.0, 16.0));
        assert!(f.is_visible(&near));

        let far = Bounds::centered(Vec2::new(500.0, 500.0), Vec2::new(16.0, 16.0));
        assert!(!f.is_visible(&far));
    }
}
