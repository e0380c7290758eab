pub mod publisher;
pub mod retry;
pub mod schedule;
pub mod sleeper;
pub mod taxonomy;


pub use publisher::{Publisher, PublisherConfig};
pub use retry::{calculate_backoff, is_transient, RetryPolicy};
pub use schedule::{check_schedule, Readiness};
pub use sleeper::{InterruptibleSleeper, Sleeper};
pub use taxonomy::{
    build_wishlist, choose_template, fetch_templates, find_match, TaxonomyResolver,
    FALLBACK_LABELS,
};
