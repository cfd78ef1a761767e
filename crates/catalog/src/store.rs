//! Listing storage.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use agrofierros_core::{DomainError, DomainResult, Entity, ListingId};

use crate::fixtures::showroom_listings;
use crate::listing::Listing;

/// Catalog store abstraction. Order of `list` is catalog order (insertion).
pub trait CatalogStore: Send + Sync {
    fn list(&self) -> Vec<Listing>;
    fn get(&self, id: &ListingId) -> Option<Listing>;
    /// Add a new listing; fails if the id is already taken.
    fn insert(&self, listing: Listing) -> DomainResult<()>;
    /// Replace an existing listing; fails if the id is unknown.
    fn update(&self, listing: Listing) -> DomainResult<()>;
    fn remove(&self, id: &ListingId) -> DomainResult<Listing>;

    /// Update when the id is known, insert otherwise.
    fn upsert(&self, listing: Listing) -> DomainResult<()> {
        if self.get(listing.id()).is_some() {
            self.update(listing)
        } else {
            self.insert(listing)
        }
    }
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn list(&self) -> Vec<Listing> {
        (**self).list()
    }

    fn get(&self, id: &ListingId) -> Option<Listing> {
        (**self).get(id)
    }

    fn insert(&self, listing: Listing) -> DomainResult<()> {
        (**self).insert(listing)
    }

    fn update(&self, listing: Listing) -> DomainResult<()> {
        (**self).update(listing)
    }

    fn remove(&self, id: &ListingId) -> DomainResult<Listing> {
        (**self).remove(id)
    }
}

/// In-memory catalog for the mocked site and tests.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Vec<Listing>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(listings: Vec<Listing>) -> Self {
        Self {
            inner: RwLock::new(listings),
        }
    }

    /// Catalog seeded with the showroom's demonstration listings.
    pub fn seeded() -> Self {
        Self::with_listings(showroom_listings())
    }
}

fn poisoned() -> DomainError {
    DomainError::invariant("catalog lock poisoned")
}

impl InMemoryCatalog {
    /// Reads survive a writer that panicked: every write replaces whole
    /// listings, so the data behind a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Listing>> {
        self.inner.read().unwrap_or_else(|err| {
            tracing::warn!("catalog lock poisoned; reading last written state");
            PoisonError::into_inner(err)
        })
    }
}

impl CatalogStore for InMemoryCatalog {
    fn list(&self) -> Vec<Listing> {
        self.read().clone()
    }

    fn get(&self, id: &ListingId) -> Option<Listing> {
        self.read().iter().find(|l| l.id() == id).cloned()
    }

    fn insert(&self, listing: Listing) -> DomainResult<()> {
        let mut listings = self.inner.write().map_err(|_| poisoned())?;
        if listings.iter().any(|l| l.id() == listing.id()) {
            return Err(DomainError::conflict(format!(
                "listing {} already exists",
                listing.id()
            )));
        }
        tracing::info!(listing_id = %listing.id(), name = listing.name(), "listing created");
        listings.push(listing);
        Ok(())
    }

    fn update(&self, listing: Listing) -> DomainResult<()> {
        let mut listings = self.inner.write().map_err(|_| poisoned())?;
        let slot = listings
            .iter_mut()
            .find(|l| l.id() == listing.id())
            .ok_or_else(DomainError::not_found)?;
        tracing::info!(listing_id = %listing.id(), status = %listing.status(), "listing updated");
        *slot = listing;
        Ok(())
    }

    fn remove(&self, id: &ListingId) -> DomainResult<Listing> {
        let mut listings = self.inner.write().map_err(|_| poisoned())?;
        let index = listings
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(DomainError::not_found)?;
        tracing::info!(listing_id = %id, "listing removed");
        Ok(listings.remove(index))
    }
}
