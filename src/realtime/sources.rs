//! Scraper backend identifiers accepted by the realtime query endpoint.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Known scraper backends, plus a passthrough for any other backend name
/// the remote service accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// URL-driven Google queries (`source: "google"`).
    Google,
    /// Google Shopping search results by query term.
    GoogleShoppingSearch,
    /// A single Google Shopping product by product id.
    GoogleShoppingProduct,
    /// Seller/pricing listings for a Google Shopping product id.
    GoogleShoppingPricing,
    /// Any other backend name, passed through verbatim.
    Custom(String),
}

impl Source {
    /// Returns the wire name sent in the `source` payload field.
    pub fn as_str(&self) -> &str {
        match self {
            Source::Google => "google",
            Source::GoogleShoppingSearch => "google_shopping_search",
            Source::GoogleShoppingProduct => "google_shopping_product",
            Source::GoogleShoppingPricing => "google_shopping_pricing",
            Source::Custom(name) => name,
        }
    }

    /// Returns whether this source takes a full URL rather than a query term.
    pub fn is_url_driven(&self) -> bool {
        matches!(self, Source::Google)
    }

    /// Returns all backends this crate knows by name.
    pub fn known() -> &'static [Source] {
        &[
            Source::Google,
            Source::GoogleShoppingSearch,
            Source::GoogleShoppingProduct,
            Source::GoogleShoppingPricing,
        ]
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn from_name(s: &str) -> Source {
    match s {
        "google" => Source::Google,
        "google_shopping_search" => Source::GoogleShoppingSearch,
        "google_shopping_product" => Source::GoogleShoppingProduct,
        "google_shopping_pricing" => Source::GoogleShoppingPricing,
        other => Source::Custom(other.to_string()),
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    /// Never fails: unknown names become [`Source::Custom`]. Empty names are
    /// rejected later by payload validation, not here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(from_name(s))
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(from_name(&name))
    }
}
