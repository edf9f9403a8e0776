//! Core business logic for galerie-rs.
//!
//! The cascading deletion engine lives here: the static cascade graph, the
//! authorization gate, the archive policy applied when a creator departs,
//! the blob cleanup coordinator and the orchestrator tying them together.

pub mod services;

pub use services::*;
