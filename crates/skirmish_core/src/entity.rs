//! Shared identity, geometry, and health components.
//!
//! Every simulated object (unit, building, projectile, wreckage)
//! composes a [`Body`] rather than inheriting from a base class.
//! Cross-entity references are plain [`EntityId`]s that must be
//! revalidated at point of use; the referenced entity may have gone
//! inactive since the reference was taken.

use serde::{Deserialize, Serialize};

use crate::math::{Bounds, Vec2};

/// Unique identifier for entities.
pub type EntityId = u64;

/// Ownership tag used for targeting and selection filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The local player.
    Player,
    /// The opposing side.
    Enemy,
    /// Unowned entities (wreckage, map features).
    Neutral,
}

impl Faction {
    /// Check whether entities of two factions may attack each other.
    ///
    /// Neutral entities neither attack nor are auto-targeted.
    #[must_use]
    pub const fn is_hostile_to(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Faction::Player, Faction::Enemy) | (Faction::Enemy, Faction::Player)
        )
    }

    /// Stable index for per-faction tables (ledgers).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Faction::Player => 0,
            Faction::Enemy => 1,
            Faction::Neutral => 2,
        }
    }

    /// Map a network owner slot to a faction.
    ///
    /// Slot 0 is the local player, slot 1 the enemy. Unknown slots
    /// yield `None` and the caller skips the record.
    #[must_use]
    pub const fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            0 => Some(Faction::Player),
            1 => Some(Faction::Enemy),
            _ => None,
        }
    }

    /// Network owner slot for this faction.
    #[must_use]
    pub const fn slot(self) -> u8 {
        match self {
            Faction::Player => 0,
            Faction::Enemy => 1,
            Faction::Neutral => 2,
        }
    }
}

/// Shared identity and geometry component.
///
/// `active = false` is the terminal marker: an inactive entity is dead
/// or spent and will be filtered out of its collection during cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Unique entity ID.
    pub id: EntityId,
    /// Owning faction.
    pub faction: Faction,
    /// Center position in world space.
    pub pos: Vec2,
    /// Footprint size (width, height).
    pub size: Vec2,
    /// Liveness flag; false is terminal.
    pub active: bool,
}

impl Body {
    /// Create a new active body.
    #[must_use]
    pub const fn new(id: EntityId, faction: Faction, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            faction,
            pos,
            size,
            active: true,
        }
    }

    /// World-space bounding box centered on the position.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.pos, self.size)
    }
}

/// Health component for damageable entities.
///
/// Invariant: `0 <= current <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Current health points.
    pub current: f32,
    /// Maximum health points.
    pub max: f32,
}

impl Health {
    /// Create at full health.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Create at a fraction of max health (buildings under construction
    /// start at 10%).
    #[must_use]
    pub fn at_fraction(max: f32, fraction: f32) -> Self {
        Self {
            current: (max * fraction).clamp(0.0, max),
            max,
        }
    }

    /// Check if the entity is dead.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Check if the entity is at full health.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Apply damage, returning the amount actually dealt.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.min(self.current).max(0.0);
        self.current -= actual;
        actual
    }

    /// Heal, returning the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let headroom = (self.max - self.current).max(0.0);
        let actual = amount.min(headroom).max(0.0);
        self.current += actual;
        actual
    }

    /// Missing health points.
    #[must_use]
    pub fn missing(&self) -> f32 {
        (self.max - self.current).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostility() {
        assert!(Faction::Player.is_hostile_to(Faction::Enemy));
        assert!(Faction::Enemy.is_hostile_to(Faction::Player));
        assert!(!Faction::Player.is_hostile_to(Faction::Player));
        assert!(!Faction::Player.is_hostile_to(Faction::Neutral));
        assert!(!Faction::Neutral.is_hostile_to(Faction::Enemy));
    }

    #[test]
    fn test_slot_mapping() {
        assert_eq!(Faction::from_slot(0), Some(Faction::Player));
        assert_eq!(Faction::from_slot(1), Some(Faction::Enemy));
        assert_eq!(Faction::from_slot(7), None);
        assert_eq!(Faction::Player.slot(), 0);
    }

    #[test]
    fn test_health_clamps() {
        let mut h = Health::new(100.0);
        assert_eq!(h.apply_damage(30.0), 30.0);
        assert_eq!(h.current, 70.0);

        // Overkill clamps at zero
        assert_eq!(h.apply_damage(500.0), 70.0);
        assert_eq!(h.current, 0.0);
        assert!(h.is_dead());

        // Healing clamps at max
        h.heal(40.0);
        assert_eq!(h.heal(1000.0), 60.0);
        assert!(h.is_full());
    }

    #[test]
    fn test_health_at_fraction() {
        let h = Health::at_fraction(200.0, 0.1);
        assert_eq!(h.current, 20.0);
        assert_eq!(h.max, 200.0);
    }

    #[test]
    fn test_body_bounds() {
        let b = Body::new(1, Faction::Player, Vec2::new(50.0, 50.0), Vec2::new(10.0, 10.0));
        let bounds = b.bounds();
        assert_eq!(bounds.x, 45.0);
        assert_eq!(bounds.center(), b.pos);
    }

    mod props {
        use proptest::prelude::*;
        use skirmish_core::entity::Faction;
        use skirmish_test_utils::strategies::arb_faction;

        proptest! {
            #[test]
            fn prop_playable_faction_slot_roundtrips(faction in arb_faction()) {
                prop_assert_eq!(Faction::from_slot(faction.slot()), Some(faction));
            }
        }
    }
}
