use serde::{Deserialize, Serialize};

/// One taxonomy label available on a destination.
///
/// Always fetched live from the destination when needed; never cached
/// between publish invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTemplate {
    pub id: String,
    pub label_text: String,
}

impl TaxonomyTemplate {
    pub fn new(id: impl Into<String>, label_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label_text: label_text.into(),
        }
    }

    /// Case-insensitive substring match against the label text.
    pub fn matches(&self, wanted: &str) -> bool {
        let wanted = wanted.trim().to_lowercase();
        !wanted.is_empty() && self.label_text.to_lowercase().contains(&wanted)
    }
}

/// An item that exists on the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: String,
    pub url: String,
}

impl RemoteItem {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}
