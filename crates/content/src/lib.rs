//! Back-office content: news articles, contact inquiries and the dashboard
//! summary built over them and the catalog.

pub mod dashboard;
pub mod inquiry;
pub mod news;

pub use dashboard::{DashboardSummary, InquirySummary, ListingSummary, summarize};
pub use inquiry::{ContactMessage, ContactPayload, Inbox};
pub use news::{NewsArticle, published_newest_first};
