//! Test fixtures and helpers.
//!
//! A small canonical definition set plus pre-built match states, so
//! tests across crates agree on unit stats.

use skirmish_core::prelude::*;

/// Basic armed unit.
pub const RIFLEMAN: UnitDefId = UnitDefId(1);
/// Worker unit: builds and repairs.
pub const ENGINEER: UnitDefId = UnitDefId(2);
/// Command structure; losing it ends the match.
pub const COMMAND_POST: BuildingDefId = BuildingDefId(1);
/// Produces riflemen.
pub const FACTORY: BuildingDefId = BuildingDefId(2);
/// Passive energy income and storage.
pub const GENERATOR: BuildingDefId = BuildingDefId(3);
/// Energy-gated defensive turret.
pub const TURRET: BuildingDefId = BuildingDefId(4);

/// The rifleman's production cost, shared with wreckage assertions.
pub const RIFLEMAN_COST: Cost = Cost::new(50.0, 10.0);

/// The canonical test definition set.
#[must_use]
pub fn test_registry() -> DefRegistry {
    let mut registry = DefRegistry::new();

    registry.register_unit(
        UnitDef::new(RIFLEMAN, "Rifleman", RIFLEMAN_COST, 2.0, 100.0, 60.0)
            .with_weapon(WeaponDef::new(8.0, 150.0, 2.0, 300.0)),
    );
    registry.register_unit(
        UnitDef::new(ENGINEER, "Engineer", Cost::new(40.0, 20.0), 3.0, 60.0, 50.0)
            .with_worker(WorkerDef { repair_rate: 20.0 }),
    );

    registry.register_building(
        BuildingDef::new(COMMAND_POST, "Command Post", Cost::new(400.0, 200.0), 30.0, 1000.0)
            .as_command()
            .with_produces(vec![ENGINEER])
            .with_effect(PassiveEffect::production(ResourceKind::Metal, 10.0))
            .with_effect(PassiveEffect::capacity(ResourceKind::Metal, 500.0))
            .with_effect(PassiveEffect::capacity(ResourceKind::Energy, 500.0)),
    );
    registry.register_building(
        BuildingDef::new(FACTORY, "Factory", Cost::new(200.0, 100.0), 10.0, 800.0)
            .with_produces(vec![RIFLEMAN]),
    );
    registry.register_building(
        BuildingDef::new(GENERATOR, "Generator", Cost::new(60.0, 0.0), 6.0, 300.0)
            .with_effect(PassiveEffect::production(ResourceKind::Energy, 20.0))
            .with_effect(PassiveEffect::capacity(ResourceKind::Energy, 100.0)),
    );
    registry.register_building(
        BuildingDef::new(TURRET, "Turret", Cost::new(80.0, 40.0), 8.0, 400.0)
            .with_turret(WeaponDef::new(12.0, 180.0, 1.5, 400.0).with_energy_per_shot(5.0)),
    );

    registry
}

/// An empty match on a 2000x2000 terrain with the canonical registry.
#[must_use]
pub fn empty_match() -> Match {
    Match::new(test_registry(), Bounds::new(0.0, 0.0, 2000.0, 2000.0))
}

/// Credit a faction's ledger, growing capacity to fit.
pub fn stock(sim: &mut Match, faction: Faction, metal: f32, energy: f32) {
    let ledger = sim.ledger_mut(faction);
    ledger.add_capacity(ResourceKind::Metal, metal);
    ledger.add_capacity(ResourceKind::Energy, energy);
    ledger.add(ResourceKind::Metal, metal);
    ledger.add(ResourceKind::Energy, energy);
}

/// A match with a stocked command post for each side, opposite corners.
#[must_use]
pub fn two_base_match() -> Match {
    let mut sim = empty_match();
    stock(&mut sim, Faction::Player, 1000.0, 500.0);
    stock(&mut sim, Faction::Enemy, 1000.0, 500.0);
    sim.spawn_completed_building(COMMAND_POST, Faction::Player, Vec2::new(200.0, 200.0));
    sim.spawn_completed_building(COMMAND_POST, Faction::Enemy, Vec2::new(1800.0, 1800.0));
    sim
}
