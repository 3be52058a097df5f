pub mod driver;

pub use driver::Rylr998;
