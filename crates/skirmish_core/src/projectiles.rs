//! Projectiles in flight.
//!
//! A projectile is aimed at its target's position at launch and then
//! flies in that fixed direction at constant speed; it never re-aims,
//! so it can whiff a fast-moving target. It carries a single target
//! reference and resolves only against that target: damage is dealt
//! the instant its center enters the target's padded bounding box. If
//! the target has meanwhile gone inactive the projectile deactivates
//! without dealing damage. Whiffed shots are culled once they leave
//! the terrain.

use serde::{Deserialize, Serialize};

use crate::buildings::Building;
use crate::combat::{self, CombatTarget};
use crate::entity::{Body, EntityId, Faction};
use crate::math::{Bounds, Vec2};
use crate::units::Unit;

/// Padding added to target bounds for hit detection, compensating for
/// discrete tick movement at high projectile speeds.
pub const HIT_PADDING: f32 = 4.0;

/// Visual footprint of a projectile.
const PROJECTILE_SIZE: Vec2 = Vec2::new(4.0, 4.0);

/// Outcome of one projectile tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Still in flight.
    InFlight,
    /// Entered the target's padded bounds; damage was applied.
    Hit(CombatTarget),
    /// Target died or the shot left the terrain; no damage.
    Expired,
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Shared identity and geometry. The faction is the shooter's.
    pub body: Body,
    /// Fixed flight velocity, set at launch.
    pub velocity: Vec2,
    /// Damage applied on hit.
    pub damage: f32,
    /// The sole entity this shot can damage. `None` on display-only
    /// projectiles rebuilt from a network snapshot; such a shot expires
    /// on its first authoritative tick.
    pub target: Option<CombatTarget>,
}

impl Projectile {
    /// Launch a projectile from `from` aimed at where the target is
    /// right now. The aim point is not updated after launch.
    #[must_use]
    pub fn launch(
        id: EntityId,
        faction: Faction,
        from: Vec2,
        aim: Vec2,
        speed: f32,
        damage: f32,
        target: CombatTarget,
    ) -> Self {
        let dir = (aim - from).normalize_or_zero();
        Self {
            body: Body::new(id, faction, from, PROJECTILE_SIZE),
            velocity: dir.scale(speed),
            damage,
            target: Some(target),
        }
    }

    /// A display-only projectile rebuilt from a network snapshot.
    #[must_use]
    pub fn remote(id: EntityId, faction: Faction, pos: Vec2) -> Self {
        Self {
            body: Body::new(id, faction, pos, PROJECTILE_SIZE),
            velocity: Vec2::ZERO,
            damage: 0.0,
            target: None,
        }
    }

    /// Advance one tick and resolve against the target.
    ///
    /// Applies damage to the target directly on hit; the caller reads
    /// the resolution to deactivate the projectile and record events.
    pub fn advance(
        &mut self,
        dt: f32,
        terrain: &Bounds,
        units: &mut [Unit],
        buildings: &mut [Building],
    ) -> Resolution {
        self.body.pos = self.body.pos + self.velocity.scale(dt);

        let Some(target) = self.target else {
            self.body.active = false;
            return Resolution::Expired;
        };
        let Some((target_pos, target_size)) = combat::resolve_target(target, units, buildings)
        else {
            self.body.active = false;
            return Resolution::Expired;
        };

        let hit_box = Bounds::centered(target_pos, target_size).expanded(HIT_PADDING);
        if hit_box.contains(self.body.pos) {
            match target {
                CombatTarget::Unit(id) => {
                    if let Some(u) = units.iter_mut().find(|u| u.body.id == id) {
                        u.health.apply_damage(self.damage);
                    }
                }
                CombatTarget::Building(id) => {
                    if let Some(b) = buildings.iter_mut().find(|b| b.body.id == id) {
                        b.health.apply_damage(self.damage);
                    }
                }
            }
            self.body.active = false;
            return Resolution::Hit(target);
        }

        if !terrain.contains(self.body.pos) {
            self.body.active = false;
            return Resolution::Expired;
        }
        Resolution::InFlight
    }
}
