//! Page-level orchestration: loading, wiring controllers to backends.

mod api_keys;
mod session_detail;
mod settings_page;

pub use api_keys::*;
pub use session_detail::*;
pub use settings_page::*;
