//! TwoTap API

pub mod client;
pub mod config;
mod errors;
pub mod models;

pub use client::*;
pub use config::{DEFAULT_BASE_URL, PrivateToken, TwoTapConfig};
pub use errors::TwoTapError;
