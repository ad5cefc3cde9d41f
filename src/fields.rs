//! Fields Input
//!
//! The `fields_input` payload of a TwoTap purchase request.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checkout::CheckoutProfile;

/// Field name TwoTap uses for the number of units to buy.
pub const QUANTITY_FIELD: &str = "quantity";

/// Fields input, keyed by site identifier.
pub type FieldsInput = FxHashMap<String, SiteFieldsInput>;

/// Selected field values for a single product, keyed by field name.
pub type ProductFields = FxHashMap<String, Value>;

/// Checkout and product field values for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFieldsInput {
    /// Guest checkout details
    pub noauth_checkout: CheckoutProfile,

    /// Selected field values per product identifier
    pub add_to_cart: FxHashMap<String, ProductFields>,
}

impl SiteFieldsInput {
    /// Create a site entry with no products.
    pub fn new(noauth_checkout: CheckoutProfile) -> Self {
        Self {
            noauth_checkout,
            add_to_cart: FxHashMap::default(),
        }
    }
}
