//! # Skirmish Net
//!
//! Thin-client networking for Skirmish multiplayer.
//!
//! The client simulation is not authoritative: a background task owns
//! the connection, decodes per-tick snapshot frames, and publishes the
//! latest one through a watch channel. The simulation side polls once
//! per tick and wholesale-replaces its entity collections from
//! whatever snapshot is current. Disconnecting clears all snapshot
//! state; a snapshot is applied atomically or not at all.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod client;
pub mod codec;
pub mod error;

pub use client::{SnapshotFeed, ThinClient};
pub use error::NetError;
