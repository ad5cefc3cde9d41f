//! Tapcart
//!
//! Cart-site data model and purchase field synthesis for the TwoTap purchase
//! automation API.

pub mod checkout;
pub mod fields;
pub mod prelude;
pub mod sites;
pub mod synthesis;
