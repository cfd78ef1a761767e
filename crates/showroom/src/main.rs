use std::sync::Arc;

use tracing::info;

use agrofierros_auth::{FileTokenStore, SessionHolder};
use agrofierros_catalog::{
    InMemoryCatalog, ListingFilter, SortSpec, available_brands, featured, price_bounds,
};
use agrofierros_client::{ApiClient, ClientConfig};
use agrofierros_content::Inbox;
use agrofierros_showroom::Showroom;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agrofierros_observability::init_from_env();

    let config = ClientConfig::from_env()?;
    let store = match &config.token_dir {
        Some(dir) => FileTokenStore::in_dir(dir),
        None => FileTokenStore::default_location()?,
    };
    info!(api_url = %config.api_url, token = ?store.path(), "starting showroom");

    let api = ApiClient::new(config)?;
    let session = Arc::new(SessionHolder::new(api, store));
    let app = Showroom::new(Arc::new(InMemoryCatalog::seeded()), session);

    if app.session().refresh().await {
        if let Some(identity) = app.session().identity().await {
            info!(user = %identity.username, role = %identity.role, "resumed admin session");
        }
    } else {
        info!("no admin session; browsing anonymously");
    }

    let listings = app.catalog().list();
    let mut filter = ListingFilter::new();
    filter.reset(price_bounds(&listings));
    info!(
        brands = ?available_brands(&listings),
        min_price = ?filter.price.min,
        max_price = ?filter.price.max,
        "catalog facets"
    );

    for listing in featured(&listings) {
        info!(name = listing.name(), price = listing.price(), "featured listing");
    }

    for card in app.catalog_page(&filter, Some(&SortSpec::admin_default())) {
        let card = serde_json::to_string(&card)?;
        info!(%card, "catalog entry");
    }

    match app.dashboard(&[], &Inbox::new()).await {
        Ok(summary) => {
            let summary = serde_json::to_string(&summary)?;
            info!(%summary, "dashboard");
        }
        Err(err) => info!(reason = %err, "dashboard unavailable"),
    }

    Ok(())
}
