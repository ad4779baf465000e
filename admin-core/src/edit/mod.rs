//! Optimistic edit state machines.
//!
//! Both controllers split a save into a synchronous request step and a
//! synchronous resolve step. The network call happens in between, owned
//! by the caller, so other events can be handled while it is in flight.

mod field;
mod group;
mod mode;

pub use field::*;
pub use group::*;
pub use mode::*;
