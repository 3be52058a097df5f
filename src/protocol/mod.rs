pub mod frame;

pub use frame::{DataFrame, FrameError, InboundFrame};
