//! HTTP API module.
//!
//! This module provides the upload page, the conversion endpoint and the
//! log stream.

pub mod logs;
pub mod page;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::start_server;
pub use types::*;
