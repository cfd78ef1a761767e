//! Sort specification and the listing comparator.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::Listing;

/// Comparable listing attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Brand,
    Model,
    Condition,
    Origin,
    Price,
    Year,
    Status,
    TransactionKind,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `field`.
    pub fn new(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Initial order of the admin listing table: most recently updated first.
    pub fn admin_default() -> Self {
        Self::descending(SortField::UpdatedAt)
    }

    /// Column-header click: flip direction on the active field, otherwise switch
    /// to `field` ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.reversed();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Compare two listings under this spec.
    ///
    /// Missing optional values (year, origin) sort after present ones in both
    /// directions.
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        let ka = SortKey::of(a, self.field);
        let kb = SortKey::of(b, self.field);

        let ordering = match (&ka, &kb) {
            (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
            (SortKey::Missing, _) => return Ordering::Greater,
            (_, SortKey::Missing) => return Ordering::Less,
            (SortKey::Text(x), SortKey::Text(y)) => collate(x, y),
            (SortKey::Number(x), SortKey::Number(y)) => x.cmp(y),
            (SortKey::Time(x), SortKey::Time(y)) => x.cmp(y),
            _ => Ordering::Equal,
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Stable in-place sort; ties keep their relative input order.
    pub fn sort(&self, listings: &mut [&Listing]) {
        listings.sort_by(|a, b| self.compare(a, b));
    }
}

enum SortKey<'a> {
    Text(&'a str),
    Number(u64),
    Time(DateTime<Utc>),
    Missing,
}

impl<'a> SortKey<'a> {
    fn of(listing: &'a Listing, field: SortField) -> Self {
        match field {
            SortField::Name => SortKey::Text(listing.name()),
            SortField::Brand => SortKey::Text(listing.brand()),
            SortField::Model => SortKey::Text(listing.model()),
            SortField::Condition => SortKey::Text(listing.condition()),
            SortField::Origin => listing.origin().map_or(SortKey::Missing, SortKey::Text),
            SortField::Price => SortKey::Number(listing.price()),
            SortField::Year => listing
                .year()
                .map_or(SortKey::Missing, |y| SortKey::Number(u64::from(y))),
            SortField::Status => SortKey::Text(listing.status().as_str()),
            SortField::TransactionKind => SortKey::Text(listing.transaction_kind().as_str()),
            SortField::CreatedAt => SortKey::Time(listing.created_at()),
            SortField::UpdatedAt => SortKey::Time(listing.updated_at()),
        }
    }
}

/// Locale-aware lexical order for catalog text.
///
/// Primary key ignores case and Spanish/Portuguese diacritics so that
/// "Álamo" sits next to "alamo"; the raw text breaks primary-key ties.
pub fn collate(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.cmp(b))
}

fn primary_key(s: &str) -> Vec<char> {
    let mut key = Vec::with_capacity(s.len());
    for c in s.chars() {
        match c {
            // ñ is its own letter, ordered right after every n.
            'ñ' | 'Ñ' => {
                key.push('n');
                key.push(char::MAX);
            }
            other => key.extend(fold_accent(other).to_lowercase()),
        }
    }
    key
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        other => other,
    }
}
