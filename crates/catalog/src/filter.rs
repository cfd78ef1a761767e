//! Filter specification for the public catalog page.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::listing::{Listing, TransactionKind};

/// Closed price interval. A missing side is unbounded.
///
/// An inverted interval (`min > max`) is accepted and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl PriceRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(min: u64, max: u64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, price: u64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }
}

/// Transient, user-driven catalog query.
///
/// All dimensions are AND-ed. An empty kind or brand set means "no
/// restriction", never "reject all".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListingFilter {
    /// Case-insensitive substring over name, brand, model and description.
    pub text: String,
    pub kinds: BTreeSet<TransactionKind>,
    pub brands: BTreeSet<String>,
    pub price: PriceRange,
}

impl ListingFilter {
    /// Filter that accepts every listing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    pub fn with_price(mut self, price: PriceRange) -> Self {
        self.price = price;
        self
    }

    /// Add the kind if absent, remove it if present.
    pub fn toggle_kind(&mut self, kind: TransactionKind) {
        if !self.kinds.remove(&kind) {
            self.kinds.insert(kind);
        }
    }

    /// Add the brand if absent, remove it if present.
    pub fn toggle_brand(&mut self, brand: &str) {
        if !self.brands.remove(brand) {
            self.brands.insert(brand.to_string());
        }
    }

    /// Clear text, kinds and brands; widen the price bound to the catalog's
    /// observed bounds.
    pub fn reset(&mut self, catalog_bounds: Option<PriceRange>) {
        self.text.clear();
        self.kinds.clear();
        self.brands.clear();
        self.price = catalog_bounds.unwrap_or_default();
    }

    /// Whether any text, kind or brand constraint is set.
    ///
    /// The price bound is excluded: it always holds some value on the page.
    pub fn is_active(&self) -> bool {
        !self.text.is_empty() || !self.kinds.is_empty() || !self.brands.is_empty()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.price.contains(listing.price())
            && (self.kinds.is_empty() || self.kinds.contains(&listing.transaction_kind()))
            && (self.brands.is_empty() || self.brands.contains(listing.brand()))
            && self.matches_text(listing)
    }

    fn matches_text(&self, listing: &Listing) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        [
            listing.name(),
            listing.brand(),
            listing.model(),
            listing.description(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}
