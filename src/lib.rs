#![cfg_attr(not(test), no_std)]

pub mod commands;
pub mod config;
pub mod lora;
pub mod protocol;
pub mod serial;

pub use lora::Rylr998;
