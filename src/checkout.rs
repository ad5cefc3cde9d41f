//! Checkout Profile
//!
//! Shopper identity, shipping and billing addresses and payment card details
//! submitted as `noauthCheckout` for every site of a purchase.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Checkout profile loading errors
#[derive(Debug, Error)]
pub enum CheckoutProfileError {
    /// IO error reading the profile file
    #[error("failed to read checkout profile: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse checkout profile: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Checkout profile
///
/// [`CheckoutProfile::default`] is the Default Checkout Profile: fixed
/// placeholder data suitable for TwoTap test mode. Deployments override it by
/// loading a complete profile from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutProfile {
    /// Shopper email address
    pub email: String,

    /// Shipping title (Mr, Ms, ...)
    pub shipping_title: String,

    /// Shipping first name
    pub shipping_first_name: String,

    /// Shipping last name
    pub shipping_last_name: String,

    /// Shipping telephone
    pub shipping_telephone: String,

    /// Shipping postal code
    pub shipping_zip: String,

    /// Shipping state
    pub shipping_state: String,

    /// Shipping city
    pub shipping_city: String,

    /// Shipping country
    pub shipping_country: String,

    /// Shipping street address
    pub shipping_address: String,

    /// Billing title (Mr, Ms, ...)
    pub billing_title: String,

    /// Billing first name
    pub billing_first_name: String,

    /// Billing last name
    pub billing_last_name: String,

    /// Billing telephone
    pub billing_telephone: String,

    /// Billing postal code
    pub billing_zip: String,

    /// Billing state
    pub billing_state: String,

    /// Billing city
    pub billing_city: String,

    /// Billing country
    pub billing_country: String,

    /// Billing street address
    pub billing_address: String,

    /// Card type (Visa, Mastercard, ...)
    pub card_type: String,

    /// Card number
    pub card_number: String,

    /// Name on card
    pub card_name: String,

    /// Four digit expiry year
    pub expiry_date_year: String,

    /// Two digit expiry month
    pub expiry_date_month: String,

    /// Card verification value
    pub cvv: String,
}

impl Default for CheckoutProfile {
    fn default() -> Self {
        Self {
            email: "shopper@gmail.com".to_owned(),
            shipping_title: "Mr".to_owned(),
            shipping_first_name: "John".to_owned(),
            shipping_last_name: "Smith".to_owned(),
            shipping_telephone: "5555555555".to_owned(),
            shipping_zip: "94303".to_owned(),
            shipping_state: "California".to_owned(),
            shipping_city: "Palo Alto".to_owned(),
            shipping_country: "United States of America".to_owned(),
            shipping_address: "555 Palo Alto Avenue".to_owned(),
            billing_title: "Mr".to_owned(),
            billing_first_name: "John".to_owned(),
            billing_last_name: "Smith".to_owned(),
            billing_telephone: "5555555555".to_owned(),
            billing_zip: "94303".to_owned(),
            billing_state: "California".to_owned(),
            billing_city: "Palo Alto".to_owned(),
            billing_country: "United States of America".to_owned(),
            billing_address: "555 Palo Alto Avenue".to_owned(),
            card_type: "Visa".to_owned(),
            card_number: "4111111111111111".to_owned(),
            card_name: "John Smith".to_owned(),
            expiry_date_year: "2018".to_owned(),
            expiry_date_month: "09".to_owned(),
            cvv: "123".to_owned(),
        }
    }
}

impl CheckoutProfile {
    /// Parse a complete profile from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or misses a field.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CheckoutProfileError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load a complete profile from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CheckoutProfileError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }
}
