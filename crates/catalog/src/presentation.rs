//! Status badge labels and tones.
//!
//! Kept as data so the shell can restyle without code changes. The defaults
//! give `reserved` its own warning tone.

use serde::{Deserialize, Serialize};

use crate::listing::ListingStatus;

/// Visual weight of a badge; the shell maps tones to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Warning,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBadge {
    pub label: String,
    pub tone: Tone,
}

impl StatusBadge {
    pub fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

/// Status → badge mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPresentation {
    pub available: StatusBadge,
    pub reserved: StatusBadge,
    pub sold: StatusBadge,
}

impl Default for StatusPresentation {
    fn default() -> Self {
        Self {
            available: StatusBadge::new("Disponible", Tone::Positive),
            reserved: StatusBadge::new("Reservado", Tone::Warning),
            sold: StatusBadge::new("Vendido", Tone::Negative),
        }
    }
}

impl StatusPresentation {
    pub fn badge(&self, status: ListingStatus) -> &StatusBadge {
        match status {
            ListingStatus::Available => &self.available,
            ListingStatus::Reserved => &self.reserved,
            ListingStatus::Sold => &self.sold,
        }
    }

    pub fn with_badge(mut self, status: ListingStatus, badge: StatusBadge) -> Self {
        match status {
            ListingStatus::Available => self.available = badge,
            ListingStatus::Reserved => self.reserved = badge,
            ListingStatus::Sold => self.sold = badge,
        }
        self
    }
}
