//! Common types and utilities shared across trawl crates.
//!
//! This crate defines the record model that flows through a scraping run,
//! plus the observability helpers every binary and test suite uses. It is
//! kept light so the driver, config and pipeline crates can all depend on it.
//!
//! # Overview
//!
//! - [`ListingStub`]: one item read off a listing page
//! - [`EnrichedRecord`]: a stub plus the detail fields pulled for it
//! - [`FieldKind`] and [`Status`]: the fixed vocabularies behind record columns
//! - [`Locator`]: how site adapters point at page elements
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use trawl_common::{EnrichedRecord, FieldKind, ListingStub, Status};
//! use url::Url;
//!
//! let stub = ListingStub {
//!     source: "bloomcare".into(),
//!     name: "Rose Court".into(),
//!     location: "Leeds, LS1".into(),
//!     url: Url::parse("https://example.com/rose-court").unwrap(),
//!     company: Some("BloomCare".into()),
//! };
//! let record = EnrichedRecord::new(stub, vec![(FieldKind::Manager, "Jane Doe".into())]);
//! assert_eq!(record.status, Status::Pending);
//! assert_eq!(record.field(FieldKind::Manager), Some("Jane Doe"));
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

mod locator;
pub mod observability;

pub use locator::Locator;

/// One item read off a listing page.
///
/// Produced by the lister and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingStub {
    /// Identifier of the site adapter that produced the stub.
    pub source: String,
    /// Display name (business name or job title).
    pub name: String,
    /// Free-form location label as shown on the listing.
    pub location: String,
    /// Absolute link to the item's detail page.
    pub url: Url,
    /// Company or parent organisation, when the site exposes one.
    pub company: Option<String>,
}

/// Secondary fields a detail page can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Manager,
    ContactNumber,
}

impl FieldKind {
    /// Column header used in progress output and spreadsheets.
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Manager => "Manager",
            FieldKind::ContactNumber => "Contact_Number",
        }
    }

    /// Placeholder written when the field could not be extracted.
    pub fn sentinel(self) -> &'static str {
        match self {
            FieldKind::Manager => "Manager not found",
            FieldKind::ContactNumber => "Contact number not found",
        }
    }
}

/// Workflow status attached to every record for later manual triage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    #[default]
    Pending,
    Failure,
}

impl Status {
    /// Every accepted value, in the order offered by spreadsheet dropdowns.
    pub const ALL: [Status; 3] = [Status::Success, Status::Pending, Status::Failure];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "Success",
            Status::Pending => "Pending",
            Status::Failure => "Failure",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A listing stub plus the detail fields extracted for it.
///
/// Field values are final strings: failed extractions already carry the
/// field's [`FieldKind::sentinel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub stub: ListingStub,
    pub fields: Vec<(FieldKind, String)>,
    pub status: Status,
}

impl EnrichedRecord {
    pub fn new(stub: ListingStub, fields: Vec<(FieldKind, String)>) -> Self {
        Self {
            stub,
            fields,
            status: Status::default(),
        }
    }

    /// Value of `kind`, if the site extracts that field at all.
    pub fn field(&self, kind: FieldKind) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_choices_in_dropdown_order() {
        let names: Vec<_> = Status::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["Success", "Pending", "Failure"]);
        assert_eq!(Status::default(), Status::Pending);
    }

    #[test]
    fn sentinels_are_stable() {
        assert_eq!(FieldKind::Manager.sentinel(), "Manager not found");
        assert_eq!(
            FieldKind::ContactNumber.sentinel(),
            "Contact number not found"
        );
    }

    #[test]
    fn field_kind_deserializes_snake_case() {
        let kind: FieldKind = serde_json::from_str("\"contact_number\"").unwrap();
        assert_eq!(kind, FieldKind::ContactNumber);
    }
}
