//! Nexx Core Library
//!
//! Core types, error taxonomy and configuration shared by the Nexx
//! notification dispatcher and its command-line front end.

pub mod config;
pub mod error;
pub mod types;

pub use config::NexxConfig;
pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path segment of the manage API version
pub const API_VERSION: &str = "v3";

/// Header carrying the per-request authentication token
pub const HEADER_REQUEST_TOKEN: &str = "X-Request-Token";

/// Header carrying the installation auth key
pub const HEADER_REQUEST_CID: &str = "X-Request-CID";

/// Remote state reported on a successful notification
pub const REMOTE_STATE_OK: &str = "ok";
