//! Purchases

pub mod config;
pub mod errors;
mod polling;
pub mod service;

pub use config::{CallbackUrls, FlowMode, PollSettings, PurchasesConfig};
pub use errors::PurchasesServiceError;
pub use service::*;
