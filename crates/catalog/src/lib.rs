//! Catalog domain: listings, the filter/sort engine and the listing store.
//!
//! Everything here is deterministic and synchronous. Recomputing the visible
//! listings is a single filter pass plus one stable sort, cheap enough to rerun
//! on every input change.

pub mod facets;
pub mod filter;
pub mod fixtures;
pub mod listing;
pub mod presentation;
pub mod query;
pub mod sort;
pub mod store;

pub use facets::{available_brands, featured, price_bounds};
pub use filter::{ListingFilter, PriceRange};
pub use listing::{Currency, Listing, ListingDetails, ListingStatus, SpecValue, TransactionKind};
pub use presentation::{StatusBadge, StatusPresentation, Tone};
pub use query::{CatalogQuery, filter_and_sort};
pub use sort::{SortDirection, SortField, SortSpec};
pub use store::{CatalogStore, InMemoryCatalog};
