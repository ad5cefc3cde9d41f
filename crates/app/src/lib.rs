//! TwoTap client and purchase flow services.

pub mod context;
pub mod purchases;
pub mod twotap;
