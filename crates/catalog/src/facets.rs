//! Derived views over the whole catalog (brand checkboxes, slider bounds,
//! home-page highlights).

use crate::filter::PriceRange;
use crate::listing::Listing;

/// Distinct brands in first-seen order.
pub fn available_brands(listings: &[Listing]) -> Vec<String> {
    let mut brands: Vec<String> = Vec::new();
    for listing in listings {
        if !brands.iter().any(|b| b == listing.brand()) {
            brands.push(listing.brand().to_string());
        }
    }
    brands
}

/// Observed `[min, max]` price, `None` for an empty catalog.
pub fn price_bounds(listings: &[Listing]) -> Option<PriceRange> {
    let min = listings.iter().map(Listing::price).min()?;
    let max = listings.iter().map(Listing::price).max()?;
    Some(PriceRange::between(min, max))
}

/// Featured listings in catalog order.
pub fn featured(listings: &[Listing]) -> Vec<&Listing> {
    listings.iter().filter(|l| l.is_featured()).collect()
}
