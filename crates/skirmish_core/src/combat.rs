//! Combat subsystem: weapon state, target acquisition, and validation.
//!
//! Combatants move through four states: idle (no target), seeking
//! (scanning for the nearest hostile in range), engaged (target within
//! fire range, cooldown ticking), and pursuing (units only: chasing a
//! target that slipped outside fire range but remains within pursuit
//! range). Hostile units are preferred over hostile buildings whenever
//! both are in range. Targets are revalidated lazily each tick and
//! cleared when inactive or beyond pursuit range.

use serde::{Deserialize, Serialize};

use crate::buildings::Building;
use crate::defs::WeaponDef;
use crate::entity::{EntityId, Faction};
use crate::math::Vec2;
use crate::units::Unit;

/// Pursuit range as a multiple of fire range.
pub const PURSUIT_FACTOR: f32 = 2.0;

/// A combat target reference. At most one variant is held at a time;
/// the enum makes a dangling unit-and-building pair unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatTarget {
    /// A hostile unit.
    Unit(EntityId),
    /// A hostile building.
    Building(EntityId),
}

/// Runtime weapon state for a unit or a defensive building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Damage per projectile hit.
    pub damage: f32,
    /// Fire range in world units.
    pub range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Projectile travel speed.
    pub projectile_speed: f32,
    /// Energy debited per shot (defensive buildings only).
    pub energy_per_shot: f32,
    /// Seconds until the next shot; fires at <= 0.
    pub cooldown: f32,
    /// Current target, if any.
    pub target: Option<CombatTarget>,
}

impl Weapon {
    /// Create weapon state from a definition.
    #[must_use]
    pub const fn from_def(def: WeaponDef) -> Self {
        Self {
            damage: def.damage,
            range: def.range,
            fire_rate: def.fire_rate,
            projectile_speed: def.projectile_speed,
            energy_per_shot: def.energy_per_shot,
            cooldown: 0.0,
            target: None,
        }
    }

    /// Tick the cooldown toward ready.
    pub fn tick_cooldown(&mut self, dt: f32) {
        self.cooldown -= dt;
    }

    /// Check if the weapon can fire.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Reset the cooldown after firing.
    pub fn reset_cooldown(&mut self) {
        self.cooldown = 1.0 / self.fire_rate;
    }

    /// Radius within which a unit keeps chasing an out-of-range target.
    #[must_use]
    pub fn pursuit_range(&self) -> f32 {
        self.range * PURSUIT_FACTOR
    }
}

/// Scan for the nearest hostile target within `range` of `origin`.
///
/// Hostile units are scanned first; a building is only returned when no
/// hostile unit is in range. `skip` excludes the scanning entity itself
/// from the unit pass.
#[must_use]
pub fn acquire_target(
    origin: Vec2,
    faction: Faction,
    range: f32,
    skip: EntityId,
    units: &[Unit],
    buildings: &[Building],
) -> Option<CombatTarget> {
    let range_sq = range * range;

    let nearest_unit = units
        .iter()
        .filter(|u| u.body.active && u.body.id != skip && faction.is_hostile_to(u.body.faction))
        .map(|u| (u.body.id, origin.distance_squared(u.body.pos)))
        .filter(|&(_, d)| d <= range_sq)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((id, _)) = nearest_unit {
        return Some(CombatTarget::Unit(id));
    }

    buildings
        .iter()
        .filter(|b| b.body.active && faction.is_hostile_to(b.body.faction))
        .map(|b| (b.body.id, origin.distance_squared(b.body.pos)))
        .filter(|&(_, d)| d <= range_sq)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| CombatTarget::Building(id))
}

/// Resolve a combat target to its current position and size, if still
/// active. Stale references yield `None` and the caller clears them.
#[must_use]
pub fn resolve_target(
    target: CombatTarget,
    units: &[Unit],
    buildings: &[Building],
) -> Option<(Vec2, Vec2)> {
    match target {
        CombatTarget::Unit(id) => units
            .iter()
            .find(|u| u.body.id == id && u.body.active)
            .map(|u| (u.body.pos, u.body.size)),
        CombatTarget::Building(id) => buildings
            .iter()
            .find(|b| b.body.id == id && b.body.active)
            .map(|b| (b.body.pos, b.body.size)),
    }
}
