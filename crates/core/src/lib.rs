//! `agrofierros-core` — shared domain building blocks.
//!
//! Typed identifiers, the domain error model and the request-state enum used by
//! every form and session action. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;
pub mod request;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ArticleId, InquiryId, ListingId};
pub use request::RequestState;
