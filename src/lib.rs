pub mod alloc;
pub mod config;
pub mod error;
pub mod exec;
pub mod fs;
pub mod registry;
pub mod wait;

pub use alloc::Allocation;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
