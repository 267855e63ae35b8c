pub mod types;
pub mod error;
pub mod time;
pub mod feed;
pub mod data;
pub mod ingest;
pub mod stats;
pub mod server;
pub mod config;

pub use types::*;
pub use error::{Result, TrackerError};
