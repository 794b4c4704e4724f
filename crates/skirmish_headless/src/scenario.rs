//! Scenario loading and match construction.
//!
//! Scenarios define the initial match state for headless runs:
//! terrain size, per-player resources, and starting forces. They are
//! stored as RON files; spawns reference the stock registry in
//! [`crate::defs`] by display name. Unknown names are skipped with a
//! warning, the rest of the scenario still loads.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use skirmish_core::prelude::*;

/// Error type for scenario operations.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Failed to read the scenario file.
    #[error("failed to read scenario file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// One starting unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpawn {
    /// Unit definition display name.
    pub def: String,
    /// Spawn X.
    pub x: f32,
    /// Spawn Y.
    pub y: f32,
}

/// One starting building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingSpawn {
    /// Building definition display name.
    pub def: String,
    /// Spawn X.
    pub x: f32,
    /// Spawn Y.
    pub y: f32,
    /// Start finished (true) or as a fresh construction site.
    pub completed: bool,
}

/// Starting state for one player slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Network player slot (0 = player, 1 = enemy).
    pub slot: u8,
    /// Starting metal.
    pub metal: f32,
    /// Starting energy.
    pub energy: f32,
    /// Metal storage capacity.
    pub metal_capacity: f32,
    /// Energy storage capacity.
    pub energy_capacity: f32,
    /// Starting units.
    pub units: Vec<UnitSpawn>,
    /// Starting buildings.
    pub buildings: Vec<BuildingSpawn>,
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name, echoed into reports.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Terrain dimensions (width, height) in world units.
    pub map_size: (f32, f32),
    /// Per-player starting state.
    pub players: Vec<PlayerSetup>,
}

impl Default for Scenario {
    fn default() -> Self {
        let base = |slot: u8, corner: f32| PlayerSetup {
            slot,
            metal: 600.0,
            energy: 300.0,
            metal_capacity: 1000.0,
            energy_capacity: 1000.0,
            units: vec![
                UnitSpawn {
                    def: "Engineer".to_string(),
                    x: corner + 100.0,
                    y: corner,
                },
                UnitSpawn {
                    def: "Tank".to_string(),
                    x: corner + 140.0,
                    y: corner,
                },
            ],
            buildings: vec![
                BuildingSpawn {
                    def: "Command Center".to_string(),
                    x: corner,
                    y: corner,
                    completed: true,
                },
                BuildingSpawn {
                    def: "Factory".to_string(),
                    x: corner,
                    y: corner + 120.0,
                    completed: true,
                },
            ],
        };
        let mut player = base(0, 300.0);
        // A mirror match between identical rush commanders can trade
        // forever; the extra tank guarantees the run converges.
        player.units.push(UnitSpawn {
            def: "Tank".to_string(),
            x: 480.0,
            y: 300.0,
        });
        Self {
            name: "Default Skirmish".to_string(),
            description: "A basic 1v1 skirmish".to_string(),
            map_size: (2048.0, 2048.0),
            players: vec![player, base(1, 1700.0)],
        }
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// Build the initial match state this scenario describes.
    #[must_use]
    pub fn build_match(&self, defs: DefRegistry) -> Match {
        let terrain = Bounds::new(0.0, 0.0, self.map_size.0, self.map_size.1);
        let mut sim = Match::new(defs, terrain);

        for player in &self.players {
            let Some(faction) = Faction::from_slot(player.slot) else {
                tracing::warn!(slot = player.slot, "unknown player slot, skipping");
                continue;
            };
            {
                let ledger = sim.ledger_mut(faction);
                ledger.add_capacity(ResourceKind::Metal, player.metal_capacity);
                ledger.add_capacity(ResourceKind::Energy, player.energy_capacity);
                ledger.add(ResourceKind::Metal, player.metal);
                ledger.add(ResourceKind::Energy, player.energy);
            }

            for building in &player.buildings {
                let Some(def) = sim.defs().building_by_name(&building.def).map(|d| d.id) else {
                    tracing::warn!(name = %building.def, "unknown building name, skipping");
                    continue;
                };
                let pos = Vec2::new(building.x, building.y);
                if building.completed {
                    sim.spawn_completed_building(def, faction, pos);
                } else {
                    sim.spawn_building(def, faction, pos);
                }
            }
            for unit in &player.units {
                let Some(def) = sim.defs().unit_by_name(&unit.def).map(|d| d.id) else {
                    tracing::warn!(name = %unit.def, "unknown unit name, skipping");
                    continue;
                };
                sim.spawn_unit(def, faction, Vec2::new(unit.x, unit.y));
            }
        }
        sim
    }
}
