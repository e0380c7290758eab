pub mod audit;
pub mod failure;
pub mod label;
pub mod outcome;
pub mod post;

pub use audit::AuditRecord;
pub use failure::{SubmissionError, SubmissionErrorKind};
pub use label::{RemoteItem, TaxonomyTemplate};
pub use outcome::{FanOutResult, Outcome, PublishStatus, SubmissionResult};
pub use post::{Content, LabelRequest, PostSpecification};
