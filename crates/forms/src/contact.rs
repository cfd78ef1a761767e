//! Public contact form: validation, submission gating and confirmation.

use tracing::{info, warn};

use agrofierros_catalog::Listing;
use agrofierros_content::ContactPayload;
use agrofierros_core::{ListingId, RequestState};

use crate::rules::{FormValues, Rule, RuleSet, ValidationReport};
use crate::submit::{ContactSubmitter, SubmitError};

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const SUBJECT: &str = "subject";
pub const MESSAGE: &str = "message";

const REQUIRED: &str = "Este campo es obligatorio";

/// Message shown when the backend could not take the inquiry.
pub const SUBMISSION_FAILED: &str =
    "Hubo un error al enviar el mensaje. Por favor intente de nuevo.";

pub fn contact_rules() -> RuleSet {
    RuleSet::new()
        .field(NAME, vec![Rule::required(REQUIRED)])
        .field(
            EMAIL,
            vec![
                Rule::required(REQUIRED),
                Rule::email("Correo electrónico inválido"),
            ],
        )
        .field(SUBJECT, vec![Rule::required(REQUIRED)])
        .field(
            MESSAGE,
            vec![
                Rule::required(REQUIRED),
                Rule::min_length(10, "El mensaje debe tener al menos 10 caracteres"),
            ],
        )
}

/// What a call to [`ContactForm::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    Sent,
    Failed,
}

/// Outstanding submission. Dropping it before `finish` returns the form
/// to idle, so an abandoned send never leaves the form stuck in flight.
struct Pending<'a>(&'a mut RequestState<(), SubmitError>);

impl<'a> Pending<'a> {
    fn begin(state: &'a mut RequestState<(), SubmitError>) -> Self {
        state.begin();
        Pending(state)
    }

    fn finish(self, result: Result<(), SubmitError>) {
        self.0.finish(result);
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if self.0.is_in_flight() {
            self.0.reset();
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    values: FormValues,
    defaults: FormValues,
    listing_id: Option<ListingId>,
    rules: RuleSet,
    report: ValidationReport,
    submission: RequestState<(), SubmitError>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::with_defaults(FormValues::new(), None)
    }
}

impl ContactForm {
    /// General inquiry with every field empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inquiry opened from a listing page; the subject names the listing.
    pub fn for_listing(listing: &Listing) -> Self {
        let mut defaults = FormValues::new();
        defaults.insert(
            SUBJECT.to_string(),
            format!("Consulta sobre {}", listing.name()),
        );
        Self::with_defaults(defaults, Some(listing.id_typed()))
    }

    fn with_defaults(defaults: FormValues, listing_id: Option<ListingId>) -> Self {
        Self {
            values: defaults.clone(),
            defaults,
            listing_id,
            rules: contact_rules(),
            report: ValidationReport::default(),
            submission: RequestState::Idle,
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn listing_id(&self) -> Option<ListingId> {
        self.listing_id
    }

    /// Errors from the last validation pass.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn validate(&mut self) -> bool {
        self.report = self.rules.validate(&self.values);
        self.report.is_valid()
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_in_flight()
    }

    /// Whether the last submission went through. The confirmation view shows
    /// until [`ContactForm::start_over`].
    pub fn is_confirmed(&self) -> bool {
        self.submission.is_succeeded()
    }

    /// User-facing error of the last failed submission.
    pub fn submission_error(&self) -> Option<&'static str> {
        self.submission.error().map(|_| SUBMISSION_FAILED)
    }

    /// Underlying cause of the last failed submission.
    pub fn failure(&self) -> Option<&SubmitError> {
        self.submission.error()
    }

    pub fn payload(&self) -> ContactPayload {
        let phone = self.value(PHONE).trim();
        ContactPayload {
            name: self.value(NAME).trim().to_string(),
            email: self.value(EMAIL).trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            subject: self.value(SUBJECT).trim().to_string(),
            message: self.value(MESSAGE).to_string(),
            listing_id: self.listing_id,
        }
    }

    /// Validate, then send through `submitter`.
    ///
    /// Values are cleared back to their defaults only on success; a failed
    /// send keeps everything the user typed. The `&mut` receiver keeps a
    /// second submit from starting while one is outstanding.
    pub async fn submit<S>(&mut self, submitter: &S) -> SubmitOutcome
    where
        S: ContactSubmitter + ?Sized,
    {
        if !self.validate() {
            return SubmitOutcome::Invalid;
        }

        let payload = self.payload();
        let pending = Pending::begin(&mut self.submission);
        let result = submitter.submit(&payload).await;
        let outcome = match &result {
            Ok(()) => {
                info!(listing_id = ?self.listing_id, "contact inquiry sent");
                self.values = self.defaults.clone();
                self.report = ValidationReport::default();
                SubmitOutcome::Sent
            }
            Err(err) => {
                warn!(error = %err, "contact inquiry failed");
                SubmitOutcome::Failed
            }
        };
        pending.finish(result);
        outcome
    }

    /// Leave the confirmation view for a fresh, empty form.
    pub fn start_over(&mut self) {
        self.submission.reset();
        self.values = self.defaults.clone();
        self.report = ValidationReport::default();
    }
}
