pub mod builder;
pub mod types;

pub use types::{CommandOutcome, DriverError, MessageState};
