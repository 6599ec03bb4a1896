pub mod errors;
pub mod events;
pub mod id;

pub use errors::{ConfigError, MercuryError};
pub use events::EventBus;
pub use id::new_correlation_id;

pub type Result<T> = std::result::Result<T, MercuryError>;
