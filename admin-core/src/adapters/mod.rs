//! In-memory implementations of the outbound ports.
//!
//! Used as test doubles and as the local backend behind the CLI's `--dev`
//! mode and the advanced settings tab.

mod memory;
mod notifier;

pub use memory::*;
pub use notifier::*;
