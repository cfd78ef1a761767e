//! The filter/sort engine: listings + filter + sort → visible listings.

use serde::{Deserialize, Serialize};

use crate::filter::ListingFilter;
use crate::listing::Listing;
use crate::sort::SortSpec;

/// Everything the catalog page needs to compute what to show.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub filter: ListingFilter,
    /// `None` keeps catalog order (public page).
    pub sort: Option<SortSpec>,
}

impl CatalogQuery {
    pub fn new(filter: ListingFilter) -> Self {
        Self { filter, sort: None }
    }

    pub fn sorted(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        filter_and_sort(listings, &self.filter, self.sort.as_ref())
    }
}

/// Keep the listings that satisfy every active predicate, then stable-sort them.
///
/// Empty input yields empty output; an inverted price bound yields empty output.
pub fn filter_and_sort<'a>(
    listings: &'a [Listing],
    filter: &ListingFilter,
    sort: Option<&SortSpec>,
) -> Vec<&'a Listing> {
    let mut visible: Vec<&Listing> = listings.iter().filter(|l| filter.matches(l)).collect();
    if let Some(spec) = sort {
        spec.sort(&mut visible);
    }
    visible
}
