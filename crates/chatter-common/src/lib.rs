pub mod errors;
pub mod id;

pub use errors::{ChatterError, ConfigError};
pub use id::{new_id, ConnectionId, UserId};

pub type Result<T> = std::result::Result<T, ChatterError>;
