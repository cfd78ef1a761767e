//! Back-office landing page summary.

use chrono::{DateTime, Utc};
use serde::Serialize;

use agrofierros_catalog::{Listing, ListingStatus};
use agrofierros_core::{Entity, InquiryId, ListingId};

use crate::inquiry::Inbox;
use crate::news::NewsArticle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingSummary {
    pub id: ListingId,
    pub name: String,
    pub price: u64,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InquirySummary {
    pub id: InquiryId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_listings: usize,
    pub available_listings: usize,
    pub unread_inquiries: usize,
    pub published_news: usize,
    pub recent_listings: Vec<ListingSummary>,
    pub recent_inquiries: Vec<InquirySummary>,
}

impl DashboardSummary {
    /// Share of available listings, rounded. `None` for an empty catalog.
    pub fn available_percentage(&self) -> Option<u8> {
        if self.total_listings == 0 {
            return None;
        }
        let pct = (self.available_listings * 100 + self.total_listings / 2) / self.total_listings;
        u8::try_from(pct).ok()
    }
}

/// Build the summary; `recent` caps both "recent" lists.
pub fn summarize(
    listings: &[Listing],
    articles: &[NewsArticle],
    inbox: &Inbox,
    recent: usize,
) -> DashboardSummary {
    let mut newest: Vec<&Listing> = listings.iter().collect();
    newest.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

    DashboardSummary {
        total_listings: listings.len(),
        available_listings: listings
            .iter()
            .filter(|l| l.status() == ListingStatus::Available)
            .count(),
        unread_inquiries: inbox.unread_count(),
        published_news: articles.iter().filter(|a| a.is_published()).count(),
        recent_listings: newest
            .into_iter()
            .take(recent)
            .map(|l| ListingSummary {
                id: l.id_typed(),
                name: l.name().to_string(),
                price: l.price(),
                status: l.status(),
                created_at: l.created_at(),
            })
            .collect(),
        recent_inquiries: inbox
            .newest_first()
            .into_iter()
            .take(recent)
            .map(|m| InquirySummary {
                id: *m.id(),
                name: m.payload.name.clone(),
                email: m.payload.email.clone(),
                subject: m.payload.subject.clone(),
                read: m.is_read(),
                created_at: m.created_at(),
            })
            .collect(),
    }
}
