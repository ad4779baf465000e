mod notifier;
mod session;
mod settings;

pub use notifier::*;
pub use session::*;
pub use settings::*;
