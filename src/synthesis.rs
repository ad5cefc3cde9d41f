//! Field Input Synthesis
//!
//! Builds the `fields_input` of a purchase request from the cart sites TwoTap
//! reports. Every product buys exactly one unit, and every other required
//! field takes the last candidate value the API offers for it.

use serde_json::Value;
use thiserror::Error;

use crate::{
    checkout::CheckoutProfile,
    fields::{FieldsInput, ProductFields, QUANTITY_FIELD, SiteFieldsInput},
    sites::{CartSites, ProductRequiredFields},
};

/// Synthesis errors
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// A required field has no candidate values to choose from
    #[error("no candidate values for field \"{field}\" of product {product} on site {site}")]
    MissingFieldValues {
        /// Site identifier
        site: String,
        /// Product identifier
        product: String,
        /// Field name
        field: String,
    },

    /// The cart sites do not have the expected shape
    #[error("malformed cart sites: {0}")]
    MalformedInput(#[from] serde_json::Error),
}

/// Synthesize fields input using the default checkout profile.
///
/// # Errors
///
/// Returns [`SynthesisError::MissingFieldValues`] if any required field other
/// than `quantity` has no candidate values.
pub fn synthesize(cart_sites: &CartSites) -> Result<FieldsInput, SynthesisError> {
    synthesize_with_profile(cart_sites, &CheckoutProfile::default())
}

/// Synthesize fields input, submitting `profile` as every site's checkout.
///
/// # Errors
///
/// Returns [`SynthesisError::MissingFieldValues`] if any required field other
/// than `quantity` has no candidate values.
pub fn synthesize_with_profile(
    cart_sites: &CartSites,
    profile: &CheckoutProfile,
) -> Result<FieldsInput, SynthesisError> {
    let mut fields_input = FieldsInput::default();

    for (site_id, site) in cart_sites {
        let mut site_input = SiteFieldsInput::new(profile.clone());

        for (product_id, required) in &site.add_to_cart {
            let fields = product_fields(required).map_err(|field| {
                SynthesisError::MissingFieldValues {
                    site: site_id.clone(),
                    product: product_id.clone(),
                    field,
                }
            })?;

            site_input.add_to_cart.insert(product_id.clone(), fields);
        }

        fields_input.insert(site_id.clone(), site_input);
    }

    Ok(fields_input)
}

/// Synthesize fields input from untyped cart sites JSON.
///
/// # Errors
///
/// Returns [`SynthesisError::MalformedInput`] if `cart_sites` does not
/// describe cart sites, or [`SynthesisError::MissingFieldValues`] as for
/// [`synthesize_with_profile`].
pub fn synthesize_value(
    cart_sites: Value,
    profile: &CheckoutProfile,
) -> Result<FieldsInput, SynthesisError> {
    let cart_sites: CartSites = serde_json::from_value(cart_sites)?;

    synthesize_with_profile(&cart_sites, profile)
}

/// Select values for one product. Fails with the name of the first field
/// that has nothing to select from.
fn product_fields(required: &ProductRequiredFields) -> Result<ProductFields, String> {
    let mut fields = ProductFields::default();

    fields.insert(QUANTITY_FIELD.to_owned(), Value::from(1));

    for field in required.required_fields.keys() {
        if field == QUANTITY_FIELD {
            continue;
        }

        let value = required
            .required_field_values
            .get(field)
            .and_then(|candidates| candidates.last())
            .map(|candidate| candidate.value.clone())
            .ok_or_else(|| field.clone())?;

        fields.insert(field.clone(), value);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn cart_sites(value: Value) -> Result<CartSites, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn selects_last_candidate_and_forces_quantity() -> TestResult {
        let sites = cart_sites(json!({
            "site1": {
                "add_to_cart": {
                    "p1": {
                        "required_fields": { "quantity": {}, "color": {} },
                        "required_field_values": {
                            "color": [{ "value": "red" }, { "value": "blue" }]
                        }
                    }
                }
            }
        }))?;

        let fields_input = synthesize(&sites)?;

        assert_eq!(
            serde_json::to_value(&fields_input)?,
            json!({
                "site1": {
                    "noauthCheckout": serde_json::to_value(CheckoutProfile::default())?,
                    "addToCart": { "p1": { "quantity": 1, "color": "blue" } }
                }
            })
        );

        Ok(())
    }

    #[test]
    fn quantity_candidates_are_ignored() -> TestResult {
        let sites = cart_sites(json!({
            "site1": {
                "add_to_cart": {
                    "p1": {
                        "required_fields": { "quantity": { "type": "input" } },
                        "required_field_values": {
                            "quantity": [{ "value": 5 }, { "value": 7 }]
                        }
                    }
                }
            }
        }))?;

        let fields_input = synthesize(&sites)?;
        let product = fields_input
            .get("site1")
            .and_then(|site| site.add_to_cart.get("p1"))
            .ok_or("product missing")?;

        assert_eq!(product.get(QUANTITY_FIELD), Some(&json!(1)));
        assert_eq!(product.len(), 1);

        Ok(())
    }

    #[test]
    fn quantity_is_set_even_when_not_required() -> TestResult {
        let sites = cart_sites(json!({
            "site1": {
                "add_to_cart": {
                    "p1": {
                        "required_fields": { "size": {} },
                        "required_field_values": { "size": [{ "value": "M" }] }
                    }
                }
            }
        }))?;

        let fields_input = synthesize(&sites)?;
        let product = fields_input
            .get("site1")
            .and_then(|site| site.add_to_cart.get("p1"))
            .ok_or("product missing")?;

        assert_eq!(product.get(QUANTITY_FIELD), Some(&json!(1)));
        assert_eq!(product.get("size"), Some(&json!("M")));

        Ok(())
    }

    #[test]
    fn unrequired_candidates_are_not_copied() -> TestResult {
        let sites = cart_sites(json!({
            "site1": {
                "add_to_cart": {
                    "p1": {
                        "required_fields": { "quantity": {} },
                        "required_field_values": { "gift_wrap": [{ "value": "yes" }] }
                    }
                }
            }
        }))?;

        let fields_input = synthesize(&sites)?;
        let product = fields_input
            .get("site1")
            .and_then(|site| site.add_to_cart.get("p1"))
            .ok_or("product missing")?;

        assert!(product.get("gift_wrap").is_none(), "gift_wrap not required");

        Ok(())
    }

    #[test]
    fn site_without_products_still_gets_checkout() -> TestResult {
        let sites = cart_sites(json!({ "site1": { "add_to_cart": {} } }))?;

        let fields_input = synthesize(&sites)?;
        let site = fields_input.get("site1").ok_or("site missing")?;

        assert!(site.add_to_cart.is_empty());
        assert_eq!(site.noauth_checkout, CheckoutProfile::default());

        Ok(())
    }

    #[test]
    fn missing_candidates_fail() -> TestResult {
        let sites = cart_sites(json!({
            "site1": {
                "add_to_cart": {
                    "p1": {
                        "required_fields": { "quantity": {}, "color": {} },
                        "required_field_values": {}
                    }
                }
            }
        }))?;

        let result = synthesize(&sites);

        assert!(
            matches!(
                &result,
                Err(SynthesisError::MissingFieldValues { site, product, field })
                    if site == "site1" && product == "p1" && field == "color"
            ),
            "expected MissingFieldValues, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn empty_candidate_list_fails() -> TestResult {
        let sites = cart_sites(json!({
            "site1": {
                "add_to_cart": {
                    "p1": {
                        "required_fields": { "color": {} },
                        "required_field_values": { "color": [] }
                    }
                }
            }
        }))?;

        let result = synthesize(&sites);

        assert!(
            matches!(result, Err(SynthesisError::MissingFieldValues { .. })),
            "expected MissingFieldValues, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn custom_profile_is_used_for_every_site() -> TestResult {
        let mut profile = CheckoutProfile::default();
        profile.email = "buyer@example.com".to_owned();

        let sites = cart_sites(json!({
            "site1": { "add_to_cart": {} },
            "site2": { "add_to_cart": {} }
        }))?;

        let fields_input = synthesize_with_profile(&sites, &profile)?;

        assert_eq!(fields_input.len(), 2);
        assert!(
            fields_input
                .values()
                .all(|site| site.noauth_checkout == profile),
            "every site should use the custom profile"
        );

        Ok(())
    }

    #[test]
    fn malformed_value_is_rejected() {
        let result = synthesize_value(
            json!({ "site1": { "add_to_cart": "not a map" } }),
            &CheckoutProfile::default(),
        );

        assert!(
            matches!(result, Err(SynthesisError::MalformedInput(_))),
            "expected MalformedInput, got {result:?}"
        );
    }

    #[test]
    fn missing_add_to_cart_is_malformed() {
        let result = synthesize_value(json!({ "site1": {} }), &CheckoutProfile::default());

        assert!(
            matches!(result, Err(SynthesisError::MalformedInput(_))),
            "expected MalformedInput, got {result:?}"
        );
    }

    #[test]
    fn repeated_calls_are_equal() -> TestResult {
        let sites = cart_sites(json!({
            "site1": {
                "add_to_cart": {
                    "p1": {
                        "required_fields": { "color": {}, "size": {} },
                        "required_field_values": {
                            "color": [{ "value": "red" }],
                            "size": [{ "value": "S" }, { "value": "XL" }]
                        }
                    }
                }
            }
        }))?;

        assert_eq!(synthesize(&sites)?, synthesize(&sites)?);

        Ok(())
    }
}
