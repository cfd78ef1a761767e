use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use agrofierros_auth::{AccessDenied, AuthBackend, Role, SessionHolder, TokenStore};
use agrofierros_catalog::{
    CatalogStore, Currency, Listing, ListingFilter, SortSpec, StatusBadge, StatusPresentation,
    filter_and_sort,
};
use agrofierros_content::{DashboardSummary, Inbox, NewsArticle, summarize};
use agrofierros_core::{DomainError, Entity, ListingId};
use agrofierros_forms::{ListingForm, ListingFormError};

/// Number of entries in the dashboard's "recent" lists.
pub const RECENT_ENTRIES: usize = 5;

#[derive(Debug, Error)]
pub enum ShowroomError {
    #[error(transparent)]
    Access(#[from] AccessDenied),

    #[error(transparent)]
    Form(#[from] ListingFormError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// What a catalog grid cell shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard {
    pub id: ListingId,
    pub name: String,
    pub brand: String,
    pub price: u64,
    pub currency: Currency,
    pub transaction_label: &'static str,
    pub badge: StatusBadge,
    pub featured: bool,
}

/// Application root. Cheap to clone; every part is shared.
pub struct Showroom<B, S> {
    catalog: Arc<dyn CatalogStore>,
    session: Arc<SessionHolder<B, S>>,
    presentation: StatusPresentation,
}

impl<B, S> Clone for Showroom<B, S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            session: Arc::clone(&self.session),
            presentation: self.presentation.clone(),
        }
    }
}

impl<B, S> Showroom<B, S>
where
    B: AuthBackend,
    S: TokenStore,
{
    pub fn new(catalog: Arc<dyn CatalogStore>, session: Arc<SessionHolder<B, S>>) -> Self {
        Self {
            catalog,
            session,
            presentation: StatusPresentation::default(),
        }
    }

    pub fn with_presentation(mut self, presentation: StatusPresentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn session(&self) -> &SessionHolder<B, S> {
        &self.session
    }

    pub fn catalog(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    fn card(&self, listing: &Listing) -> ListingCard {
        let details = listing.details();
        ListingCard {
            id: listing.id_typed(),
            name: details.name.clone(),
            brand: details.brand.clone(),
            price: details.price,
            currency: details.currency,
            transaction_label: details.transaction_kind.label(),
            badge: self.presentation.badge(details.status).clone(),
            featured: details.featured,
        }
    }

    /// Public catalog grid for the current filter and sort.
    pub fn catalog_page(&self, filter: &ListingFilter, sort: Option<&SortSpec>) -> Vec<ListingCard> {
        let listings = self.catalog.list();
        filter_and_sort(&listings, filter, sort)
            .into_iter()
            .map(|listing| self.card(listing))
            .collect()
    }

    /// Back-office landing page; editors and admins only.
    pub async fn dashboard(
        &self,
        articles: &[NewsArticle],
        inbox: &Inbox,
    ) -> Result<DashboardSummary, ShowroomError> {
        self.session.require_role(Role::Editor).await?;
        Ok(summarize(&self.catalog.list(), articles, inbox, RECENT_ENTRIES))
    }

    /// Persist a listing form; editors and admins only.
    pub async fn save_listing(
        &self,
        form: &mut ListingForm,
        now: DateTime<Utc>,
    ) -> Result<Listing, ShowroomError> {
        let identity = self.session.require_role(Role::Editor).await?;
        let listing = form.save(self.catalog.as_ref(), now)?;
        info!(listing_id = %listing.id(), user = %identity.username, "listing saved from back office");
        Ok(listing)
    }

    /// Delete a listing; admins only.
    pub async fn delete_listing(&self, id: &ListingId) -> Result<Listing, ShowroomError> {
        let identity = self.session.require_role(Role::Admin).await?;
        let removed = self.catalog.remove(id)?;
        info!(listing_id = %id, user = %identity.username, "listing deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::TimeZone;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use agrofierros_auth::{AuthError, Credentials, Identity, MemoryTokenStore};
    use agrofierros_catalog::fixtures::seed_id;
    use agrofierros_catalog::{InMemoryCatalog, SortField, Tone, TransactionKind};

    use super::*;

    struct StaticBackend {
        identity: Identity,
    }

    #[async_trait]
    impl AuthBackend for StaticBackend {
        async fn login(&self, _credentials: &Credentials) -> Result<String, AuthError> {
            jsonwebtoken::encode(
                &Header::default(),
                &json!({ "user": self.identity }),
                &EncodingKey::from_secret(b"test-secret"),
            )
            .map_err(|e| AuthError::Decode(e.to_string()))
        }

        async fn profile(&self, _token: &str) -> Result<Identity, AuthError> {
            Ok(self.identity.clone())
        }
    }

    fn showroom(role: Role) -> Showroom<StaticBackend, MemoryTokenStore> {
        let backend = StaticBackend {
            identity: Identity {
                id: "u-7".to_string(),
                username: "lucia".to_string(),
                email: "lucia@agrofierros.uy".to_string(),
                role,
            },
        };
        Showroom::new(
            Arc::new(InMemoryCatalog::seeded()),
            Arc::new(SessionHolder::new(backend, MemoryTokenStore::new())),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn catalog_page_filters_sorts_and_labels() {
        let app = showroom(Role::Editor);
        let filter = ListingFilter::new().with_kind(TransactionKind::Consignment);
        let cards = app.catalog_page(&filter, Some(&SortSpec::new(SortField::Price)));

        let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Minicargadora Case", "Cabezal MacDon FD75"]);
        assert_eq!(cards[0].transaction_label, "Consignación");
        assert_eq!(cards[0].badge.label, "Disponible");
        assert_eq!(cards[0].badge.tone, Tone::Positive);
    }

    #[tokio::test]
    async fn anonymous_visitors_cannot_reach_back_office() {
        let app = showroom(Role::Admin);
        let err = app.dashboard(&[], &Inbox::new()).await.unwrap_err();
        assert!(matches!(err, ShowroomError::Access(AccessDenied::Anonymous)));
    }

    #[tokio::test]
    async fn editor_sees_dashboard_but_cannot_delete() {
        let app = showroom(Role::Editor);
        assert!(app.session().login("lucia@agrofierros.uy", "pw").await);

        let summary = app.dashboard(&[], &Inbox::new()).await.unwrap();
        assert_eq!(summary.total_listings, 5);
        assert_eq!(summary.available_percentage(), Some(100));

        let err = app.delete_listing(&seed_id(1)).await.unwrap_err();
        assert!(matches!(
            err,
            ShowroomError::Access(AccessDenied::Forbidden { .. })
        ));
        assert_eq!(app.catalog().list().len(), 5);
    }

    #[tokio::test]
    async fn admin_edits_and_deletes() {
        let app = showroom(Role::Admin);
        assert!(app.session().login("lucia@agrofierros.uy", "pw").await);

        let listing = app.catalog().get(&seed_id(3)).unwrap();
        let mut form = ListingForm::edit(&listing);
        form.set(agrofierros_forms::listing_form::STATUS, "reserved");
        let saved = app.save_listing(&mut form, now()).await.unwrap();
        assert_eq!(saved.updated_at(), now());

        let filter = ListingFilter::new().with_text("580N");
        let cards = app.catalog_page(&filter, None);
        assert_eq!(cards[0].badge.label, "Reservado");
        assert_eq!(cards[0].badge.tone, Tone::Warning);

        let removed = app.delete_listing(&seed_id(3)).await.unwrap();
        assert_eq!(removed.id_typed(), seed_id(3));
        assert_eq!(app.catalog().list().len(), 4);
    }
}
