//! Userdeck Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging setup and error handling for the userdeck workspace.
//!
//! - **Error Handling**: process-level error type and result alias
//! - **Logging**: `tracing` subscriber configuration shared by every binary
//! - **Types**: wire shapes returned by the remote user listing service
//!
//! # Example
//!
//! ```no_run
//! use userdeck_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> userdeck_common::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     let _guard = init_logging(&config)?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, UserdeckError};
pub use types::{ListingPage, RawUserRecord};
