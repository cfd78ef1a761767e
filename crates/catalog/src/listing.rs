use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrofierros_core::{DomainError, DomainResult, Entity, ListingId};

/// Commercial arrangement under which a listing is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Direct sale by the dealer.
    Sale,
    /// Exchange against other machinery.
    Trade,
    /// Sold on behalf of the owner for a commission.
    Consignment,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 3] = [
        TransactionKind::Sale,
        TransactionKind::Trade,
        TransactionKind::Consignment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "sale",
            TransactionKind::Trade => "trade",
            TransactionKind::Consignment => "consignment",
        }
    }

    /// Customer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "Venta directa",
            TransactionKind::Trade => "Permuta",
            TransactionKind::Consignment => "Consignación",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sale" => Ok(TransactionKind::Sale),
            "trade" => Ok(TransactionKind::Trade),
            "consignment" => Ok(TransactionKind::Consignment),
            other => Err(DomainError::validation(format!(
                "unknown transaction kind '{other}'"
            ))),
        }
    }
}

/// Listing lifecycle status.
///
/// Transitions are unconstrained: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Reserved,
    Sold,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Available,
        ListingStatus::Reserved,
        ListingStatus::Sold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "available",
            ListingStatus::Reserved => "reserved",
            ListingStatus::Sold => "sold",
        }
    }
}

impl core::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(ListingStatus::Available),
            "reserved" => Ok(ListingStatus::Reserved),
            "sold" => Ok(ListingStatus::Sold),
            other => Err(DomainError::validation(format!("unknown status '{other}'"))),
        }
    }
}

/// Currency a price is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "UYU")]
    Uyu,
}

/// Free-form specification value (e.g. `"Yanmar 3TNV88"` or `5617`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Number(f64),
    Text(String),
}

impl core::fmt::Display for SpecValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SpecValue::Number(n) => write!(f, "{n}"),
            SpecValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for SpecValue {
    fn from(value: &str) -> Self {
        SpecValue::Text(value.to_string())
    }
}

impl From<f64> for SpecValue {
    fn from(value: f64) -> Self {
        SpecValue::Number(value)
    }
}

/// Editable attributes of a listing (everything except identity and timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetails {
    pub name: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub description: String,
    /// Whole units of `currency`.
    pub price: u64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(rename = "transactionType")]
    pub transaction_kind: TransactionKind,
    /// Percentage in `0..=100`, consignment only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub specifications: BTreeMap<String, SpecValue>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub status: ListingStatus,
}

impl ListingDetails {
    /// Minimal details: an available, non-featured listing priced in USD.
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        price: u64,
        transaction_kind: TransactionKind,
    ) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            model: model.into(),
            description: String::new(),
            price,
            currency: Currency::Usd,
            transaction_kind,
            commission_rate: None,
            year: None,
            origin: None,
            condition: String::new(),
            specifications: BTreeMap::new(),
            images: Vec::new(),
            featured: false,
            status: ListingStatus::Available,
        }
    }

    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.brand.trim().is_empty() {
            return Err(DomainError::validation("brand cannot be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(DomainError::validation("model cannot be empty"));
        }
        if self.year == Some(0) {
            return Err(DomainError::validation("year must be a positive integer"));
        }
        if let Some(rate) = self.commission_rate {
            if !(0.0..=100.0).contains(&rate) {
                return Err(DomainError::validation(
                    "commission rate must be between 0 and 100",
                ));
            }
        }
        Ok(())
    }
}

/// A product entry shown in the catalog.
///
/// # Invariants
/// - `id` never changes after creation.
/// - `price` is non-negative (enforced by the type).
/// - `updated_at >= created_at` when mutated through [`Listing::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    id: ListingId,
    #[serde(flatten)]
    details: ListingDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(id: ListingId, details: ListingDetails, at: DateTime<Utc>) -> DomainResult<Self> {
        details.validate()?;
        Ok(Self {
            id,
            details,
            created_at: at,
            updated_at: at,
        })
    }

    /// Replace every editable attribute, keeping identity and creation time.
    pub fn update(&mut self, details: ListingDetails, at: DateTime<Utc>) -> DomainResult<()> {
        details.validate()?;
        self.details = details;
        self.updated_at = at;
        Ok(())
    }

    pub fn set_status(&mut self, status: ListingStatus, at: DateTime<Utc>) {
        self.details.status = status;
        self.updated_at = at;
    }

    pub fn id_typed(&self) -> ListingId {
        self.id
    }

    pub fn details(&self) -> &ListingDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn brand(&self) -> &str {
        &self.details.brand
    }

    pub fn model(&self) -> &str {
        &self.details.model
    }

    pub fn description(&self) -> &str {
        &self.details.description
    }

    pub fn price(&self) -> u64 {
        self.details.price
    }

    pub fn transaction_kind(&self) -> TransactionKind {
        self.details.transaction_kind
    }

    pub fn status(&self) -> ListingStatus {
        self.details.status
    }

    pub fn year(&self) -> Option<u16> {
        self.details.year
    }

    pub fn origin(&self) -> Option<&str> {
        self.details.origin.as_deref()
    }

    pub fn condition(&self) -> &str {
        &self.details.condition
    }

    pub fn is_featured(&self) -> bool {
        self.details.featured
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Listing {
    type Id = ListingId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
