//! # lumen-app
//!
//! Application layer — the scene engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `LightCommander` — deliver adjustments to the light-control collaborator
//!   - `EventPublisher` — publish engine events
//!   - `Clock` — the current position in the day cycle
//! - Run the **scene engine**: arbitrate active scenes, evaluate curves,
//!   track manual overrides and per-entity timeshifts, emit commands
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `lumen-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod activation;
pub mod engine;
pub mod event_bus;
pub mod override_tracker;
pub mod ports;
pub mod resolve;
pub mod timeshift;
