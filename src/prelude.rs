//! Tapcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    checkout::{CheckoutProfile, CheckoutProfileError},
    fields::{FieldsInput, ProductFields, QUANTITY_FIELD, SiteFieldsInput},
    sites::{CartSite, CartSites, FieldCandidate, ProductRequiredFields},
    synthesis::{SynthesisError, synthesize, synthesize_value, synthesize_with_profile},
};
