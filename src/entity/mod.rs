//! Entity types
//!
//! The two concrete record types the engine stores: transit lines (the
//! dimension side) and vehicles (the detail side, carrying a foreign key
//! into lines). Each implements the storage codec seam
//! ([`crate::store::Record`]) and the collaborator seam defined here.

mod line;
mod vehicle;

pub use line::Line;
pub use vehicle::Vehicle;

use crate::error::Result;
use crate::store::Record;
use crate::text::Field;

/// External-collaborator contract layered over [`Record`]: construction
/// from decoded text fields, display rendering, and predicate matching.
pub trait Entity: Record {
    /// Name of the field that is unique per record, if any; predicate
    /// queries on it stop at the first match.
    const UNIQUE_FIELD: Option<&'static str>;

    /// Build a record from decoded field values in import column order.
    fn from_fields(live: bool, fields: &[Field]) -> Result<Self>;

    /// Render for display using the label strings from a store header.
    fn render(&self, labels: &[String]) -> String;

    /// Whether the named field equals the given text value.
    ///
    /// Fails with `UnknownField` for a name the entity does not have;
    /// a null field matches nothing.
    fn matches(&self, field: &str, value: &str) -> Result<bool>;
}

/// Shared display fallback for null values.
pub(crate) const NULL_FIELD: &str = "field is null";

/// Render one labeled value line.
pub(crate) fn labeled(out: &mut String, labels: &[String], i: usize, fallback: &str, value: &str) {
    let label = labels
        .get(i)
        .map(String::as_str)
        .filter(|l| !l.is_empty())
        .unwrap_or(fallback);
    out.push_str(label);
    out.push_str(": ");
    out.push_str(if value.is_empty() { NULL_FIELD } else { value });
    out.push('\n');
}
