//! Back-office listing editor.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;
use tracing::info;

use agrofierros_catalog::{
    CatalogStore, Currency, Listing, ListingDetails, ListingStatus, SpecValue, TransactionKind,
};
use agrofierros_core::{DomainError, Entity, ListingId};

use crate::rules::{FormValues, Rule, RuleSet, ValidationReport};

pub const NAME: &str = "name";
pub const BRAND: &str = "brand";
pub const MODEL: &str = "model";
pub const YEAR: &str = "year";
pub const PRICE: &str = "price";
pub const CURRENCY: &str = "currency";
pub const DESCRIPTION: &str = "description";
pub const CONDITION: &str = "condition";
pub const ORIGIN: &str = "origin";
pub const TRANSACTION_KIND: &str = "transactionType";
pub const COMMISSION_RATE: &str = "commissionRate";
pub const STATUS: &str = "status";

const REQUIRED: &str = "Este campo es obligatorio";

pub fn listing_rules(current_year: i32) -> RuleSet {
    let required = || vec![Rule::required(REQUIRED)];
    RuleSet::new()
        .field(NAME, required())
        .field(BRAND, required())
        .field(MODEL, required())
        .field(
            YEAR,
            vec![Rule::range(1900.0, f64::from(current_year), "Año inválido")],
        )
        .field(
            PRICE,
            vec![
                Rule::required(REQUIRED),
                Rule::min_exclusive(0.0, "El precio debe ser mayor a 0"),
            ],
        )
        .field(CURRENCY, vec![Rule::one_of(["USD", "UYU"], "Moneda inválida")])
        .field(DESCRIPTION, required())
        .field(CONDITION, required())
        .field(
            TRANSACTION_KIND,
            vec![
                Rule::required(REQUIRED),
                Rule::one_of(TransactionKind::ALL.map(|k| k.as_str()), "Tipo inválido"),
            ],
        )
        .field(
            COMMISSION_RATE,
            vec![Rule::range(0.0, 100.0, "Porcentaje inválido (0-100)")],
        )
        .field(
            STATUS,
            vec![
                Rule::required(REQUIRED),
                Rule::one_of(ListingStatus::ALL.map(|s| s.as_str()), "Estado inválido"),
            ],
        )
}

#[derive(Debug, Error)]
pub enum ListingFormError {
    #[error("listing form has {} invalid field(s)", .0.len())]
    Invalid(ValidationReport),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Create/edit form for one listing.
///
/// Scalar fields are held as raw text; the specification map, image list and
/// featured flag are edited through dedicated operations.
#[derive(Debug, Clone)]
pub struct ListingForm {
    values: FormValues,
    featured: bool,
    specifications: BTreeMap<String, SpecValue>,
    images: Vec<String>,
    editing: Option<Listing>,
    rules: RuleSet,
    report: ValidationReport,
}

impl ListingForm {
    /// Empty form for a new listing: direct sale, available, priced in USD.
    pub fn create() -> Self {
        let mut values = FormValues::new();
        values.insert(TRANSACTION_KIND.to_string(), TransactionKind::Sale.as_str().to_string());
        values.insert(STATUS.to_string(), ListingStatus::Available.as_str().to_string());
        values.insert(CURRENCY.to_string(), "USD".to_string());
        Self {
            values,
            featured: false,
            specifications: BTreeMap::new(),
            images: Vec::new(),
            editing: None,
            rules: listing_rules(Utc::now().year()),
            report: ValidationReport::default(),
        }
    }

    /// Form populated from an existing listing.
    pub fn edit(listing: &Listing) -> Self {
        let d = listing.details();
        let mut form = Self::create();
        form.set(NAME, &d.name);
        form.set(BRAND, &d.brand);
        form.set(MODEL, &d.model);
        form.set(YEAR, d.year.map(|y| y.to_string()).unwrap_or_default());
        form.set(PRICE, d.price.to_string());
        form.set(CURRENCY, currency_code(d.currency));
        form.set(DESCRIPTION, &d.description);
        form.set(CONDITION, &d.condition);
        form.set(ORIGIN, d.origin.clone().unwrap_or_default());
        form.set(TRANSACTION_KIND, d.transaction_kind.as_str());
        form.set(
            COMMISSION_RATE,
            d.commission_rate.map(|r| r.to_string()).unwrap_or_default(),
        );
        form.set(STATUS, d.status.as_str());
        form.featured = d.featured;
        form.specifications = d.specifications.clone();
        form.images = d.images.clone();
        form.editing = Some(listing.clone());
        form
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set_featured(&mut self, featured: bool) {
        self.featured = featured;
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn specifications(&self) -> &BTreeMap<String, SpecValue> {
        &self.specifications
    }

    /// Add or overwrite a specification. Ignored unless both sides are
    /// non-blank after trimming.
    pub fn add_specification(&mut self, key: &str, value: &str) -> bool {
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            return false;
        }
        self.specifications
            .insert(key.to_string(), SpecValue::Text(value.to_string()));
        true
    }

    pub fn remove_specification(&mut self, key: &str) -> Option<SpecValue> {
        self.specifications.remove(key)
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn add_image(&mut self, reference: &str) -> bool {
        let reference = reference.trim();
        if reference.is_empty() {
            return false;
        }
        self.images.push(reference.to_string());
        true
    }

    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    fn is_consignment(&self) -> bool {
        self.value(TRANSACTION_KIND).parse::<TransactionKind>().ok()
            == Some(TransactionKind::Consignment)
    }

    /// The commission field only exists for consignments.
    pub fn validate(&mut self) -> bool {
        let mut report = self.rules.validate(&self.values);
        if !self.is_consignment() {
            report.remove(COMMISSION_RATE);
        }
        self.report = report;
        self.report.is_valid()
    }

    fn details(&self) -> Result<ListingDetails, ListingFormError> {
        let kind: TransactionKind = self.value(TRANSACTION_KIND).parse()?;
        let price = parse_number(self.value(PRICE))
            .ok_or_else(|| DomainError::validation("price must be a number"))?;
        let mut details = ListingDetails::new(
            self.value(NAME).trim(),
            self.value(BRAND).trim(),
            self.value(MODEL).trim(),
            price.round() as u64,
            kind,
        );
        details.description = self.value(DESCRIPTION).trim().to_string();
        details.condition = self.value(CONDITION).trim().to_string();
        details.origin = non_blank(self.value(ORIGIN));
        details.status = self.value(STATUS).parse()?;
        details.currency = match self.value(CURRENCY).trim() {
            "UYU" => Currency::Uyu,
            _ => Currency::Usd,
        };
        details.year = match non_blank(self.value(YEAR)) {
            Some(year) => Some(
                year.parse::<u16>()
                    .map_err(|_| DomainError::validation("year must be a whole number"))?,
            ),
            None => None,
        };
        if kind == TransactionKind::Consignment {
            details.commission_rate = non_blank(self.value(COMMISSION_RATE))
                .and_then(|rate| parse_number(&rate));
        }
        details.featured = self.featured;
        details.specifications = self.specifications.clone();
        details.images = self.images.clone();
        Ok(details)
    }

    /// Validate and build the listing without storing it.
    ///
    /// Creation gets a fresh id with both timestamps at `now`; an edit keeps
    /// the id and creation time and moves `updated_at` to `now`.
    pub fn build(&mut self, now: DateTime<Utc>) -> Result<Listing, ListingFormError> {
        if !self.validate() {
            return Err(ListingFormError::Invalid(self.report.clone()));
        }
        let details = self.details()?;
        match &self.editing {
            Some(existing) => {
                let mut listing = existing.clone();
                listing.update(details, now)?;
                Ok(listing)
            }
            None => Ok(Listing::new(ListingId::new(), details, now)?),
        }
    }

    /// Build and persist. A saved creation turns the form into an edit of the
    /// stored listing.
    pub fn save<S>(&mut self, store: &S, now: DateTime<Utc>) -> Result<Listing, ListingFormError>
    where
        S: CatalogStore + ?Sized,
    {
        let listing = self.build(now)?;
        if self.editing.is_some() {
            store.update(listing.clone())?;
        } else {
            store.insert(listing.clone())?;
        }
        info!(listing_id = %listing.id(), "listing form saved");
        self.editing = Some(listing.clone());
        Ok(listing)
    }
}

fn currency_code(currency: Currency) -> &'static str {
    match currency {
        Currency::Usd => "USD",
        Currency::Uyu => "UYU",
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use agrofierros_catalog::InMemoryCatalog;
    use agrofierros_catalog::fixtures::seed_id;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
    }

    fn filled() -> ListingForm {
        let mut form = ListingForm::create();
        form.set(NAME, "Sembradora Baldan");
        form.set(BRAND, "Baldan");
        form.set(MODEL, "SPD 3000");
        form.set(PRICE, "18500");
        form.set(DESCRIPTION, "Sembradora de siembra directa, 13 líneas.");
        form.set(CONDITION, "Usado - Buen estado");
        form
    }

    #[test]
    fn year_rules_follow_the_calendar() {
        let rules = listing_rules(2024);
        let check = |year: &str| rules.check(YEAR, year);
        assert_eq!(check("1899"), Some("Año inválido"));
        assert_eq!(check("2025"), Some("Año inválido"));
        assert_eq!(check("1900"), None);
        assert_eq!(check("2024"), None);
        assert_eq!(check(""), None);
    }

    #[test]
    fn price_must_be_positive() {
        let mut form = filled();
        form.set(PRICE, "0");
        assert!(!form.validate());
        assert_eq!(form.report().error(PRICE), Some("El precio debe ser mayor a 0"));

        form.set(PRICE, "");
        assert!(!form.validate());
        assert_eq!(form.report().error(PRICE), Some(REQUIRED));
    }

    #[test]
    fn commission_is_checked_only_for_consignment() {
        let mut form = filled();
        form.set(COMMISSION_RATE, "150");
        assert!(form.validate());

        form.set(TRANSACTION_KIND, "consignment");
        assert!(!form.validate());
        assert_eq!(
            form.report().error(COMMISSION_RATE),
            Some("Porcentaje inválido (0-100)")
        );

        form.set(COMMISSION_RATE, "8");
        let listing = form.build(now()).unwrap();
        assert_eq!(listing.details().commission_rate, Some(8.0));
    }

    #[test]
    fn commission_is_dropped_for_other_kinds() {
        let mut form = filled();
        form.set(COMMISSION_RATE, "12");
        let listing = form.build(now()).unwrap();
        assert_eq!(listing.details().commission_rate, None);
    }

    #[test]
    fn specifications_require_both_sides() {
        let mut form = filled();
        assert!(!form.add_specification("  ", "algo"));
        assert!(!form.add_specification("motor", "   "));
        assert!(form.add_specification(" motor ", " Deutz "));
        assert_eq!(
            form.specifications().get("motor"),
            Some(&SpecValue::Text("Deutz".into()))
        );
        assert!(form.remove_specification("motor").is_some());
        assert!(form.specifications().is_empty());
    }

    #[test]
    fn images_append_and_remove_by_index() {
        let mut form = filled();
        assert!(!form.add_image("  "));
        form.add_image("a.jpg");
        form.add_image(" b.jpg ");
        assert_eq!(form.images(), ["a.jpg", "b.jpg"]);
        assert_eq!(form.remove_image(0).as_deref(), Some("a.jpg"));
        assert_eq!(form.remove_image(5), None);
        assert_eq!(form.images(), ["b.jpg"]);
    }

    #[test]
    fn invalid_form_is_not_saved() {
        let store = InMemoryCatalog::new();
        let mut form = ListingForm::create();
        let err = form.save(&store, now()).unwrap_err();
        match err {
            ListingFormError::Invalid(report) => {
                assert_eq!(report.error(NAME), Some(REQUIRED));
                assert_eq!(report.error(YEAR), None);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.list().is_empty());
    }

    #[test]
    fn create_then_save_again_updates_the_same_listing() {
        let store = InMemoryCatalog::new();
        let mut form = filled();
        form.set(YEAR, "2015");
        form.set_featured(true);
        let created = form.save(&store, now()).unwrap();
        assert!(form.is_editing());
        assert_eq!(created.year(), Some(2015));
        assert!(created.is_featured());

        let later = now() + chrono::Duration::hours(1);
        form.set(STATUS, "reserved");
        let updated = form.save(&store, later).unwrap();

        assert_eq!(updated.id_typed(), created.id_typed());
        assert_eq!(updated.created_at(), now());
        assert_eq!(updated.updated_at(), later);
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].status(), ListingStatus::Reserved);
    }

    #[test]
    fn edit_populates_from_listing_and_preserves_identity() {
        let store = InMemoryCatalog::seeded();
        let original = store.get(&seed_id(2)).unwrap();
        let mut form = ListingForm::edit(&original);

        assert_eq!(form.value(NAME), "Cabezal MacDon FD75");
        assert_eq!(form.value(PRICE), "64000");
        assert_eq!(form.value(TRANSACTION_KIND), "consignment");
        assert_eq!(form.specifications().len(), 4);

        form.set(PRICE, "61000");
        let saved = form.save(&store, now()).unwrap();
        assert_eq!(saved.id_typed(), seed_id(2));
        assert_eq!(saved.created_at(), original.created_at());
        assert_eq!(store.get(&seed_id(2)).unwrap().price(), 61_000);
        assert_eq!(store.list().len(), 5);
    }
}
