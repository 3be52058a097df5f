pub mod traits;

pub use traits::{SerialError, SerialPort};
