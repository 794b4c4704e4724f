//! # Skirmish Core
//!
//! Single-threaded match simulation core for Skirmish.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO or networking (the wire payload types live here, the socket
//!   handling does not)
//! - No system randomness
//!
//! The match advances in fixed 1/60 s ticks in a strict, deterministic
//! step order, so the same order stream replays to the same state.
//!
//! ## Crate Structure
//!
//! - [`math`] - 2D vectors, bounding boxes, angle helpers
//! - [`entity`] - shared identity/geometry/health components
//! - [`resources`] - per-faction metal and energy ledger
//! - [`progress`] - the resource-gated progress algorithm
//! - [`defs`] - data-driven unit and building definitions
//! - [`units`], [`buildings`], [`projectiles`], [`wreckage`] - entity kinds
//! - [`combat`] - target acquisition and weapon state
//! - [`collision`], [`fog`] - movement resolution and visibility
//! - [`sim`] - the tick orchestrator
//! - [`snapshot`] - thin-client state rebuild from server payloads

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod buildings;
pub mod collision;
pub mod combat;
pub mod defs;
pub mod entity;
pub mod fog;
pub mod math;
pub mod progress;
pub mod projectiles;
pub mod resources;
pub mod sim;
pub mod snapshot;
pub mod units;
pub mod wreckage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::buildings::{Building, OrderError, ProductionJob};
    pub use crate::combat::{CombatTarget, Weapon};
    pub use crate::defs::{
        BuildingDef, BuildingDefId, DefRegistry, PassiveEffect, UnitDef, UnitDefId, WeaponDef,
        WorkerDef,
    };
    pub use crate::entity::{Body, EntityId, Faction, Health};
    pub use crate::math::{Bounds, Vec2};
    pub use crate::projectiles::Projectile;
    pub use crate::resources::{Cost, ResourceKind, ResourceLedger, ResourcePool};
    pub use crate::sim::{Commander, Match, MatchOutcome, NullCommander, TickEvents, TICK_RATE, TICK_SECONDS};
    pub use crate::snapshot::Snapshot;
    pub use crate::units::Unit;
    pub use crate::wreckage::Wreckage;
}
