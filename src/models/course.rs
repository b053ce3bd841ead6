//! Course records extracted from a listing page.

use serde::{Deserialize, Serialize};

/// One course card scraped from a listing page.
///
/// The record lives only long enough to be rendered into a [`Document`]
/// and embedded; it is never persisted on its own.
///
/// [`Document`]: super::Document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    pub price: String,
    pub details: String,
}

impl CourseRecord {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            details: details.into(),
        }
    }

    /// Render the record as the text that gets chunked and embedded.
    pub fn to_text(&self) -> String {
        format!("{}\n{}\n\n{}", self.name, self.price, self.details)
    }
}
