//! The stock definition set used by headless matches.
//!
//! Scenarios reference definitions by these numeric codes; the same
//! codes appear in network snapshots.

use skirmish_core::prelude::*;

/// Worker: builds and repairs.
pub const ENGINEER: UnitDefId = UnitDefId(1);
/// Line combat unit.
pub const TANK: UnitDefId = UnitDefId(2);
/// Fast, unarmed reconnaissance unit.
pub const SCOUT: UnitDefId = UnitDefId(3);

/// Command structure; its loss ends the match.
pub const COMMAND_CENTER: BuildingDefId = BuildingDefId(1);
/// Produces tanks and scouts.
pub const FACTORY: BuildingDefId = BuildingDefId(2);
/// Passive metal income.
pub const EXTRACTOR: BuildingDefId = BuildingDefId(3);
/// Passive energy income and storage.
pub const GENERATOR: BuildingDefId = BuildingDefId(4);
/// Energy-gated defensive turret.
pub const TURRET: BuildingDefId = BuildingDefId(5);

/// Build the stock registry.
#[must_use]
pub fn default_registry() -> DefRegistry {
    let mut registry = DefRegistry::new();

    registry.register_unit(
        UnitDef::new(ENGINEER, "Engineer", Cost::new(40.0, 20.0), 4.0, 80.0, 55.0)
            .with_worker(WorkerDef { repair_rate: 20.0 }),
    );
    registry.register_unit(
        UnitDef::new(TANK, "Tank", Cost::new(90.0, 30.0), 6.0, 220.0, 50.0)
            .with_weapon(WeaponDef::new(15.0, 160.0, 1.2, 350.0))
            .with_size(Vec2::new(20.0, 20.0)),
    );
    registry.register_unit(
        UnitDef::new(SCOUT, "Scout", Cost::new(30.0, 5.0), 2.0, 50.0, 110.0)
            .with_sight_range(320.0),
    );

    registry.register_building(
        BuildingDef::new(COMMAND_CENTER, "Command Center", Cost::new(500.0, 250.0), 45.0, 1500.0)
            .as_command()
            .with_size(Vec2::new(64.0, 64.0))
            .with_produces(vec![ENGINEER])
            .with_effect(PassiveEffect::production(ResourceKind::Metal, 8.0))
            .with_effect(PassiveEffect::production(ResourceKind::Energy, 8.0))
            .with_effect(PassiveEffect::capacity(ResourceKind::Metal, 600.0))
            .with_effect(PassiveEffect::capacity(ResourceKind::Energy, 600.0)),
    );
    registry.register_building(
        BuildingDef::new(FACTORY, "Factory", Cost::new(220.0, 120.0), 18.0, 900.0)
            .with_produces(vec![TANK, SCOUT]),
    );
    registry.register_building(
        BuildingDef::new(EXTRACTOR, "Extractor", Cost::new(80.0, 20.0), 8.0, 350.0)
            .with_effect(PassiveEffect::production(ResourceKind::Metal, 12.0))
            .with_effect(PassiveEffect::capacity(ResourceKind::Metal, 200.0)),
    );
    registry.register_building(
        BuildingDef::new(GENERATOR, "Generator", Cost::new(60.0, 0.0), 6.0, 300.0)
            .with_effect(PassiveEffect::production(ResourceKind::Energy, 20.0))
            .with_effect(PassiveEffect::consumption(ResourceKind::Metal, 1.0))
            .with_effect(PassiveEffect::capacity(ResourceKind::Energy, 150.0)),
    );
    registry.register_building(
        BuildingDef::new(TURRET, "Turret", Cost::new(100.0, 50.0), 10.0, 500.0)
            .with_turret(WeaponDef::new(18.0, 200.0, 1.5, 450.0).with_energy_per_shot(6.0)),
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_registry_shape() {
        let registry = default_registry();
        assert!(registry.unit(TANK).is_some_and(|d| d.weapon.is_some()));
        assert!(registry.unit(SCOUT).is_some_and(|d| d.weapon.is_none()));
        assert!(registry
            .building(COMMAND_CENTER)
            .is_some_and(|d| d.command && d.can_produce(ENGINEER)));
        assert!(registry
            .building(FACTORY)
            .is_some_and(|d| d.can_produce(TANK) && d.can_produce(SCOUT)));
        assert!(registry
            .building(TURRET)
            .is_some_and(|d| d.turret.is_some_and(|w| w.energy_per_shot > 0.0)));
    }
}
