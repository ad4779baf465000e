mod error;
mod fields;
pub mod models;
mod notification;
pub mod ports;
mod status;

pub use error::*;
pub use fields::*;
pub use models::*;
pub use notification::*;
pub use status::*;
