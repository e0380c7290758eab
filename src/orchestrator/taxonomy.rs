//! Reactive taxonomy label discovery.
//!
//! Destinations may reject a submission that carries no label without
//! publishing a stable label id up front, so the id is looked up only after
//! such a rejection.

use tracing::{debug, warn};

use crate::client::SubmissionClient;
use crate::models::{LabelRequest, TaxonomyTemplate};

/// Generic label names tried after the requested and configured ones.
pub const FALLBACK_LABELS: &[&str] = &["Discussion", "Research", "Project", "Education", "Resource"];

pub struct TaxonomyResolver<'a, C: SubmissionClient + ?Sized> {
    client: &'a C,
    default_text: Option<&'a str>,
}

impl<'a, C: SubmissionClient + ?Sized> TaxonomyResolver<'a, C> {
    pub fn new(client: &'a C, default_text: Option<&'a str>) -> Self {
        Self {
            client,
            default_text,
        }
    }

    /// Find a label for `destination`, falling back to the first available one.
    ///
    /// Returns `None` only when the destination exposes no labels at all (or
    /// both listing accessors failed).
    pub fn resolve(
        &self,
        destination: &str,
        request: Option<&LabelRequest>,
    ) -> Option<TaxonomyTemplate> {
        let templates = fetch_templates(self.client, destination);
        let wishlist = build_wishlist(request.and_then(LabelRequest::text), self.default_text);
        let picked = choose_template(&templates, &wishlist).cloned();
        match &picked {
            Some(t) => debug!(destination, label = %t.label_text, id = %t.id, "resolved label"),
            None => debug!(destination, "destination exposes no labels"),
        }
        picked
    }

    /// Find the label matching `text` exactly as requested, with no fallbacks.
    pub fn find_requested(&self, destination: &str, text: &str) -> Option<TaxonomyTemplate> {
        let templates = fetch_templates(self.client, destination);
        find_match(&templates, &[text.to_string()]).cloned()
    }
}

/// List labels through the primary accessor, then the raw one; never fails.
pub fn fetch_templates<C: SubmissionClient + ?Sized>(
    client: &C,
    destination: &str,
) -> Vec<TaxonomyTemplate> {
    let templates = match client.list_labels(destination) {
        Ok(templates) => templates,
        Err(primary) => {
            debug!(destination, error = %primary, "primary label listing failed, trying raw listing");
            match client.list_labels_raw(destination) {
                Ok(templates) => templates,
                Err(raw) => {
                    warn!(destination, error = %raw, "could not list labels");
                    Vec::new()
                }
            }
        }
    };

    templates
        .into_iter()
        .filter(|t| !t.id.is_empty() && !t.label_text.is_empty())
        .collect()
}

/// Ordered wishes: requested text, configured default, then [`FALLBACK_LABELS`].
pub fn build_wishlist(requested: Option<&str>, default_text: Option<&str>) -> Vec<String> {
    requested
        .into_iter()
        .chain(default_text)
        .chain(FALLBACK_LABELS.iter().copied())
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// First template whose text contains a wish, scanning wishes in order.
pub fn find_match<'t>(
    templates: &'t [TaxonomyTemplate],
    wishlist: &[String],
) -> Option<&'t TaxonomyTemplate> {
    wishlist
        .iter()
        .find_map(|wish| templates.iter().find(|t| t.matches(wish)))
}

/// Like [`find_match`], but falls back to the first template.
pub fn choose_template<'t>(
    templates: &'t [TaxonomyTemplate],
    wishlist: &[String],
) -> Option<&'t TaxonomyTemplate> {
    find_match(templates, wishlist).or_else(|| templates.first())
}
