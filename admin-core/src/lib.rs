//! Inline-edit core for the session admin tool.
//!
//! The crate is laid out as a small hexagon: [`domain`] holds the records,
//! field descriptors and outbound ports, [`edit`] holds the per-field and
//! per-group edit state machines, [`views`] wires them into the session
//! detail and settings pages, and [`adapters`] provides in-memory
//! implementations of the ports.

pub mod adapters;
pub mod domain;
pub mod edit;
pub mod views;

pub use domain::ports::outbound::*;
pub use domain::*;
pub use edit::*;
pub use views::*;
