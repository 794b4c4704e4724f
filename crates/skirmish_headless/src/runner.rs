//! Match execution for headless testing.
//!
//! Runs a scenario to completion (or a tick limit) with a scripted
//! commander on each side and collects a JSON-serializable report.
//! Commanders issue orders exclusively through the simulation's public
//! methods; there is no privileged API.

use serde::Serialize;
use tracing::{debug, info};

use skirmish_core::prelude::*;

use crate::defs;
use crate::scenario::Scenario;

/// A simple aggressive commander: keeps production queues busy and
/// sends every idle armed unit at the nearest hostile.
#[derive(Debug, Clone, Copy)]
pub struct RushCommander {
    faction: Faction,
}

impl RushCommander {
    /// Create a commander for one side.
    #[must_use]
    pub const fn new(faction: Faction) -> Self {
        Self { faction }
    }

    fn nearest_hostile(&self, sim: &Match, from: Vec2) -> Option<Vec2> {
        let unit_positions = sim
            .units()
            .iter()
            .filter(|u| u.body.active && self.faction.is_hostile_to(u.body.faction))
            .map(|u| u.body.pos);
        let building_positions = sim
            .buildings()
            .iter()
            .filter(|b| b.body.active && self.faction.is_hostile_to(b.body.faction))
            .map(|b| b.body.pos);

        unit_positions
            .chain(building_positions)
            .min_by(|a, b| from.distance_squared(*a).total_cmp(&from.distance_squared(*b)))
    }
}

impl Commander for RushCommander {
    fn update(&mut self, _dt: f32, sim: &mut Match) {
        // Keep every idle production queue busy, preferring armed units.
        let production: Vec<(EntityId, UnitDefId)> = sim
            .buildings()
            .iter()
            .filter(|b| {
                b.body.active
                    && b.body.faction == self.faction
                    && b.is_complete()
                    && b.queue.is_empty()
            })
            .filter_map(|b| {
                let def = sim.defs().building(b.def)?;
                let armed = def
                    .produces
                    .iter()
                    .copied()
                    .find(|&u| sim.defs().unit(u).is_some_and(|d| d.weapon.is_some()));
                let unit = armed.or_else(|| def.produces.first().copied())?;
                Some((b.body.id, unit))
            })
            .collect();
        for (building, unit) in production {
            // Full or still-constructing buildings just decline.
            let _ = sim.order_produce(building, unit);
        }

        // Point idle armed units at the nearest hostile; combat takes
        // over once something comes into range.
        let orders: Vec<(EntityId, Vec2)> = sim
            .units()
            .iter()
            .filter(|u| {
                u.body.active
                    && u.body.faction == self.faction
                    && u.move_target.is_none()
                    && u.weapon.is_some_and(|w| w.target.is_none())
            })
            .filter_map(|u| self.nearest_hostile(sim, u.body.pos).map(|pos| (u.body.id, pos)))
            .collect();
        for (id, pos) in orders {
            if let Some(unit) = sim.unit_mut(id) {
                unit.order_move(pos);
            }
        }
    }
}

/// Two commanders sharing one tick, one per side.
struct CommanderPair {
    player: RushCommander,
    enemy: RushCommander,
}

impl Commander for CommanderPair {
    fn update(&mut self, dt: f32, sim: &mut Match) {
        self.player.update(dt, sim);
        self.enemy.update(dt, sim);
    }
}

/// Result of one headless run.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// Scenario name.
    pub scenario: String,
    /// Final outcome; `InProgress` means the tick limit was hit.
    pub outcome: MatchOutcome,
    /// Ticks simulated.
    pub ticks: u64,
    /// Simulated seconds.
    pub sim_seconds: f32,
    /// Total projectiles launched.
    pub shots_fired: u64,
    /// Units destroyed across both sides.
    pub units_destroyed: usize,
    /// Buildings destroyed across both sides.
    pub buildings_destroyed: usize,
    /// Player units alive at the end.
    pub player_units: usize,
    /// Enemy units alive at the end.
    pub enemy_units: usize,
}

/// Runs scenarios against the stock definition set.
#[derive(Debug, Clone)]
pub struct MatchRunner {
    registry: DefRegistry,
}

impl Default for MatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchRunner {
    /// Create a runner with the stock registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: defs::default_registry(),
        }
    }

    /// Run a scenario until someone wins or the tick limit is hit.
    pub fn run(&self, scenario: &Scenario, max_ticks: u64) -> MatchReport {
        let mut sim = scenario.build_match(self.registry.clone());
        let mut commanders = CommanderPair {
            player: RushCommander::new(Faction::Player),
            enemy: RushCommander::new(Faction::Enemy),
        };
        info!(scenario = %scenario.name, max_ticks, "starting headless run");

        let mut shots_fired: u64 = 0;
        let mut units_destroyed = 0;
        let mut buildings_destroyed = 0;

        for _ in 0..max_ticks {
            let events = sim.tick(&mut commanders);
            shots_fired += u64::from(events.shots_fired);
            units_destroyed += events.destroyed_units.len();
            buildings_destroyed += events.destroyed_buildings.len();

            if sim.outcome() != MatchOutcome::InProgress {
                break;
            }
            if sim.ticks() % 3600 == 0 {
                debug!(
                    tick = sim.ticks(),
                    units = sim.units().len(),
                    "run in progress"
                );
            }
        }

        let count = |faction: Faction| {
            sim.units()
                .iter()
                .filter(|u| u.body.active && u.body.faction == faction)
                .count()
        };
        info!(outcome = ?sim.outcome(), ticks = sim.ticks(), "run finished");

        MatchReport {
            scenario: scenario.name.clone(),
            outcome: sim.outcome(),
            ticks: sim.ticks(),
            sim_seconds: sim.ticks() as f32 * TICK_SECONDS,
            shots_fired,
            units_destroyed,
            buildings_destroyed,
            player_units: count(Faction::Player),
            enemy_units: count(Faction::Enemy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_runs_to_a_result() {
        let runner = MatchRunner::new();
        // Generous limit: two rush armies meet well before 10 minutes.
        let report = runner.run(&Scenario::default(), 36_000);
        assert!(report.ticks > 0);
        assert!(report.shots_fired > 0, "armies never engaged");
        assert_ne!(report.outcome, MatchOutcome::InProgress, "no winner found");
    }

    #[test]
    fn test_tick_limit_yields_in_progress() {
        let runner = MatchRunner::new();
        let report = runner.run(&Scenario::default(), 10);
        assert_eq!(report.outcome, MatchOutcome::InProgress);
        assert_eq!(report.ticks, 10);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let runner = MatchRunner::new();
        let report = runner.run(&Scenario::default(), 5);
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"scenario\""));
        assert!(json.contains("\"outcome\""));
    }
}
