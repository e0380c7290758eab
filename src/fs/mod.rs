pub mod audit;
pub mod drafts;
pub mod locking;

pub use audit::{AuditLog, ERRORS_LOG, RESULTS_LOG};
pub use drafts::{render_markdown, render_path, write_render, POSTS_DIR};
pub use locking::{locked_append, locked_read, locked_write};
