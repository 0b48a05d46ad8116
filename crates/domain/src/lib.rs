//! # lumen-domain
//!
//! Pure domain model for the lumen dynamic light-scene engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, time-of-day arithmetic
//! - Define **curves** (time-keyed value tracks with wrap-around interpolation)
//! - Define **scenes** (named, prioritised bundles of curves per entity)
//! - Define light **attributes** (brightness, colour temperature, power) and their values
//! - Define **commands** and **readings** exchanged with the light-control collaborator
//! - Define **events** (engine activity records)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod curve;
pub mod event;
pub mod light;
pub mod scene;
