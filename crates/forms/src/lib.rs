//! Form handling for the public contact form and the back-office listing editor.
//!
//! Validation is declarative: a [`RuleSet`] maps each field to an ordered list
//! of rules and the first failing rule's message is reported. Submission is
//! gated on a clean report and tracked with a [`agrofierros_core::RequestState`].

pub mod contact;
pub mod listing_form;
pub mod rules;
pub mod submit;

pub use contact::{ContactForm, SubmitOutcome, contact_rules};
pub use listing_form::{ListingForm, ListingFormError, listing_rules};
pub use rules::{FormValues, Rule, RuleSet, ValidationReport};
pub use submit::{ContactSubmitter, SubmitError};
