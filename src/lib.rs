// Library exports for cmdfifo
// This allows the test suite to import modules

pub mod config;
pub mod error;
pub mod fifo;

pub use config::{Config, TargetSelectionMode};
pub use error::ChannelError;
