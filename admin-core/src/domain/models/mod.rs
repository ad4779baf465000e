mod ids;
mod session;
mod settings;

pub use ids::*;
pub use session::*;
pub use settings::*;
