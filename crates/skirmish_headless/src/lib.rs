//! # Skirmish Headless
//!
//! Runs matches without graphics for CI testing and balance work.
//!
//! A scenario (RON file or the built-in default) defines terrain,
//! starting resources, and initial forces. The runner ticks the match
//! against a scripted enemy commander and emits a JSON report of the
//! result.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod defs;
pub mod runner;
pub mod scenario;
