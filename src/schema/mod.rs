//! Post document schema, loading and validation

mod parser;
mod types;
mod validation;


pub use parser::{is_post_file, load_post_file, parse_json, parse_yaml, POST_EXTENSIONS};
pub use types::{RawPostSpec, SchemaReport, ValidationError};
pub use validation::{check, validate, TITLE_SOFT_LIMIT};
