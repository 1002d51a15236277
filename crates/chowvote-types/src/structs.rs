//! Entity structs shared between the server and the browser client.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A restaurant proposed during the adding phase.
///
/// Identity is the `(name, added_by)` pair: two members may propose the
/// same name, and a member may only withdraw the entries they added.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Restaurant {
    /// Restaurant name as typed by the proposer.
    pub name: String,
    /// Display name of the member who proposed it.
    pub added_by: String,
}

impl Restaurant {
    /// Create a restaurant entry.
    pub fn new(name: impl Into<String>, added_by: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            added_by: added_by.into(),
        }
    }

    /// Whether this entry is exactly `(name, added_by)`.
    pub fn matches(&self, name: &str, added_by: &str) -> bool {
        self.name == name && self.added_by == added_by
    }
}
