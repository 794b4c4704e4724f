//! Data-driven unit and building definitions.
//!
//! Stats live in definition tables looked up by ID, not in per-type
//! code. Optional capability blocks (weapon, worker, turret, passive
//! economy effects) mark where behavior differs, so new unit kinds are
//! new table rows rather than new types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::resources::{Cost, ResourceKind};

/// Unique identifier for unit definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitDefId(pub u16);

/// Unique identifier for building definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingDefId(pub u16);

/// Weapon stats shared by mobile units and defensive buildings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    /// Damage per projectile hit.
    pub damage: f32,
    /// Fire range in world units.
    pub range: f32,
    /// Shots per second; cooldown resets to `1 / fire_rate`.
    pub fire_rate: f32,
    /// Projectile travel speed in world units per second.
    pub projectile_speed: f32,
    /// Energy debited from the owner's ledger per shot. Zero for unit
    /// weapons; defensive buildings withhold fire below this balance.
    pub energy_per_shot: f32,
}

impl WeaponDef {
    /// Create a unit weapon (no energy gate).
    #[must_use]
    pub const fn new(damage: f32, range: f32, fire_rate: f32, projectile_speed: f32) -> Self {
        Self {
            damage,
            range,
            fire_rate,
            projectile_speed,
            energy_per_shot: 0.0,
        }
    }

    /// Builder method to set the per-shot energy cost.
    #[must_use]
    pub const fn with_energy_per_shot(mut self, energy: f32) -> Self {
        self.energy_per_shot = energy;
        self
    }
}

/// Worker capability: constructing buildings and repairing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkerDef {
    /// Health restored per second while repairing.
    pub repair_rate: f32,
}

/// Definition of a unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDef {
    /// Unique identifier.
    pub id: UnitDefId,
    /// Display name.
    pub name: String,
    /// Production cost.
    pub cost: Cost,
    /// Production time in seconds.
    pub build_time: f32,
    /// Maximum health.
    pub health: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Turn rate in radians per second.
    pub rotation_speed: f32,
    /// Footprint size.
    pub size: Vec2,
    /// Fog-of-war reveal radius.
    pub sight_range: f32,
    /// Weapon, if the unit can fight.
    pub weapon: Option<WeaponDef>,
    /// Worker capability, if the unit can build and repair.
    pub worker: Option<WorkerDef>,
}

impl UnitDef {
    /// Create a new unit definition with no capabilities.
    #[must_use]
    pub fn new(id: UnitDefId, name: impl Into<String>, cost: Cost, build_time: f32, health: f32, speed: f32) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            build_time,
            health,
            speed,
            rotation_speed: std::f32::consts::PI,
            size: Vec2::new(16.0, 16.0),
            sight_range: 200.0,
            weapon: None,
            worker: None,
        }
    }

    /// Builder method to attach a weapon.
    #[must_use]
    pub fn with_weapon(mut self, weapon: WeaponDef) -> Self {
        self.weapon = Some(weapon);
        self
    }

    /// Builder method to attach worker capability.
    #[must_use]
    pub fn with_worker(mut self, worker: WorkerDef) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Builder method to set the turn rate.
    #[must_use]
    pub fn with_rotation_speed(mut self, radians_per_sec: f32) -> Self {
        self.rotation_speed = radians_per_sec;
        self
    }

    /// Builder method to set the footprint size.
    #[must_use]
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Builder method to set the sight range.
    #[must_use]
    pub fn with_sight_range(mut self, range: f32) -> Self {
        self.sight_range = range;
        self
    }
}

/// Passive economy contribution of a completed building, applied to the
/// owner's ledger exactly once when construction finishes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassiveEffect {
    /// Affected resource.
    pub kind: ResourceKind,
    /// Income per second.
    pub production: f32,
    /// Drain per second.
    pub consumption: f32,
    /// Storage capacity added.
    pub capacity: f32,
}

impl PassiveEffect {
    /// Pure income effect.
    #[must_use]
    pub const fn production(kind: ResourceKind, amount: f32) -> Self {
        Self {
            kind,
            production: amount,
            consumption: 0.0,
            capacity: 0.0,
        }
    }

    /// Pure drain effect.
    #[must_use]
    pub const fn consumption(kind: ResourceKind, amount: f32) -> Self {
        Self {
            kind,
            production: 0.0,
            consumption: amount,
            capacity: 0.0,
        }
    }

    /// Pure storage effect.
    #[must_use]
    pub const fn capacity(kind: ResourceKind, amount: f32) -> Self {
        Self {
            kind,
            production: 0.0,
            consumption: 0.0,
            capacity: amount,
        }
    }
}

/// Definition of a building type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDef {
    /// Unique identifier.
    pub id: BuildingDefId,
    /// Display name.
    pub name: String,
    /// Construction cost.
    pub cost: Cost,
    /// Construction time in seconds.
    pub build_time: f32,
    /// Maximum health.
    pub health: f32,
    /// Footprint size.
    pub size: Vec2,
    /// Fog-of-war reveal radius.
    pub sight_range: f32,
    /// Unit types this building can produce.
    pub produces: Vec<UnitDefId>,
    /// Defensive weapon, if any.
    pub turret: Option<WeaponDef>,
    /// Ledger deltas applied once on completion.
    pub effects: Vec<PassiveEffect>,
    /// Losing this building ends the match immediately for its owner.
    pub command: bool,
}

impl BuildingDef {
    /// Create a new building definition with no capabilities.
    #[must_use]
    pub fn new(id: BuildingDefId, name: impl Into<String>, cost: Cost, build_time: f32, health: f32) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            build_time,
            health,
            size: Vec2::new(48.0, 48.0),
            sight_range: 250.0,
            produces: Vec::new(),
            turret: None,
            effects: Vec::new(),
            command: false,
        }
    }

    /// Builder method to set producible unit types.
    #[must_use]
    pub fn with_produces(mut self, units: Vec<UnitDefId>) -> Self {
        self.produces = units;
        self
    }

    /// Builder method to attach a defensive weapon.
    #[must_use]
    pub fn with_turret(mut self, weapon: WeaponDef) -> Self {
        self.turret = Some(weapon);
        self
    }

    /// Builder method to add a passive economy effect.
    #[must_use]
    pub fn with_effect(mut self, effect: PassiveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Builder method to mark this as a command structure.
    #[must_use]
    pub fn as_command(mut self) -> Self {
        self.command = true;
        self
    }

    /// Builder method to set the footprint size.
    #[must_use]
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Check if this building can produce a given unit type.
    #[must_use]
    pub fn can_produce(&self, unit_type: UnitDefId) -> bool {
        self.produces.contains(&unit_type)
    }
}

/// Registry of all unit and building definitions for a match.
///
/// Unknown IDs are not an error anywhere in the core: lookups return
/// `None` and the caller skips creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefRegistry {
    units: HashMap<UnitDefId, UnitDef>,
    buildings: HashMap<BuildingDefId, BuildingDef>,
}

impl DefRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: HashMap::new(),
            buildings: HashMap::new(),
        }
    }

    /// Register a unit definition.
    pub fn register_unit(&mut self, def: UnitDef) {
        self.units.insert(def.id, def);
    }

    /// Register a building definition.
    pub fn register_building(&mut self, def: BuildingDef) {
        self.buildings.insert(def.id, def);
    }

    /// Look up a unit definition.
    #[must_use]
    pub fn unit(&self, id: UnitDefId) -> Option<&UnitDef> {
        self.units.get(&id)
    }

    /// Look up a building definition.
    #[must_use]
    pub fn building(&self, id: BuildingDefId) -> Option<&BuildingDef> {
        self.buildings.get(&id)
    }

    /// Find a unit definition by display name.
    #[must_use]
    pub fn unit_by_name(&self, name: &str) -> Option<&UnitDef> {
        self.units.values().find(|d| d.name == name)
    }

    /// Find a building definition by display name.
    #[must_use]
    pub fn building_by_name(&self, name: &str) -> Option<&BuildingDef> {
        self.buildings.values().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let mut reg = DefRegistry::new();
        reg.register_unit(UnitDef::new(
            UnitDefId(1),
            "Scout",
            Cost::new(50.0, 0.0),
            2.0,
            80.0,
            120.0,
        ));
        reg.register_building(
            BuildingDef::new(BuildingDefId(1), "Factory", Cost::new(200.0, 100.0), 20.0, 800.0)
                .with_produces(vec![UnitDefId(1)]),
        );

        assert_eq!(reg.unit(UnitDefId(1)).map(|d| d.name.as_str()), Some("Scout"));
        assert!(reg.unit(UnitDefId(99)).is_none());
        assert!(reg.building(BuildingDefId(1)).is_some_and(|b| b.can_produce(UnitDefId(1))));
        assert!(!reg.building(BuildingDefId(1)).is_some_and(|b| b.can_produce(UnitDefId(2))));
        assert!(reg.unit_by_name("Scout").is_some());
        assert!(reg.building_by_name("Depot").is_none());
    }

    #[test]
    fn test_builders() {
        let def = BuildingDef::new(BuildingDefId(2), "Turret", Cost::new(80.0, 40.0), 8.0, 400.0)
            .with_turret(WeaponDef::new(12.0, 180.0, 1.5, 400.0).with_energy_per_shot(5.0))
            .as_command();
        assert!(def.command);
        let turret = def.turret.expect("turret");
        assert_eq!(turret.energy_per_shot, 5.0);

        let gen = BuildingDef::new(BuildingDefId(3), "Generator", Cost::new(60.0, 0.0), 6.0, 300.0)
            .with_effect(PassiveEffect::production(ResourceKind::Energy, 20.0))
            .with_effect(PassiveEffect::capacity(ResourceKind::Energy, 100.0));
        assert_eq!(gen.effects.len(), 2);
    }
}
