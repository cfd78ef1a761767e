//! `agrofierros-showroom` — application root wiring the catalog, the admin
//! session and the back-office operations together.

pub mod app;

pub use app::{ListingCard, Showroom, ShowroomError};
