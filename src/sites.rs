//! Cart Sites
//!
//! The per-storefront description TwoTap reports once a cart has finished
//! processing. Only the parts needed to build a purchase request are modelled;
//! any other keys the API sends are ignored on deserialisation.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cart sites, keyed by site identifier.
pub type CartSites = FxHashMap<String, CartSite>;

/// A storefront grouping within a cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSite {
    /// Products added to the cart for this site, keyed by product identifier
    /// (usually the md5 of the product URL).
    pub add_to_cart: FxHashMap<String, ProductRequiredFields>,
}

/// The checkout fields a single product requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRequiredFields {
    /// Required field names. TwoTap describes each field with an object we never inspect.
    pub required_fields: FxHashMap<String, Value>,

    /// Candidate values per field, in the order the API offers them.
    #[serde(default)]
    pub required_field_values: FxHashMap<String, Vec<FieldCandidate>>,

    /// Product URL, when the API reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One possible value for a required field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCandidate {
    /// The value to submit if this candidate is selected.
    pub value: Value,
}

impl CartSite {
    /// Product URLs reported for this site, in no particular order.
    pub fn product_urls(&self) -> impl Iterator<Item = &str> {
        self.add_to_cart
            .values()
            .filter_map(|product| product.url.as_deref())
    }
}
