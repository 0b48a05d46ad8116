//! # lumen-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON service API** the host platform dispatches scene
//!   calls through (`/api/services/…`)
//! - Serve the **scene snapshot** for reading and replacement
//!   (`/api/scenes`)
//! - Serve **per-entity status** (`/api/entities`) and a **live event
//!   stream** (`/api/events/stream`, SSE)
//! - Map HTTP requests into engine calls (driving adapter)
//! - Map engine results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `lumen-app` (for the engine and port traits) and
//! `lumen-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
