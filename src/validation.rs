//! Input validation and sanitization for outbox.
//!
//! These helpers check user-supplied names before they reach a remote API
//! or are turned into file names.

use anyhow::{bail, Result};

/// Maximum allowed length for destination names and remote ids.
pub const MAX_NAME_LENGTH: usize = 128;

/// Maximum length of a slug derived from a title.
pub const MAX_SLUG_LENGTH: usize = 80;

/// Validates a destination name (e.g. a subreddit).
///
/// A destination is valid if:
/// - It is not empty
/// - It is no longer than MAX_NAME_LENGTH characters
/// - It contains no path separators (`/`, `\`)
/// - It contains no whitespace or control characters
///
/// # Examples
///
/// ```
/// use outbox::validation::validate_destination;
///
/// assert!(validate_destination("rust").is_ok());
/// assert!(validate_destination("r/rust").is_err());
/// assert!(validate_destination("machine learning").is_err());
/// ```
pub fn validate_destination(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("destination cannot be empty");
    }

    if name.len() > MAX_NAME_LENGTH {
        bail!(
            "destination too long: {} characters (max {})",
            name.len(),
            MAX_NAME_LENGTH
        );
    }

    if let Some(c) = name.chars().find(|c| *c == '/' || *c == '\\') {
        bail!("destination contains path separator '{c}'");
    }

    if name.chars().any(char::is_whitespace) {
        bail!("destination contains whitespace");
    }

    if name.chars().any(char::is_control) {
        bail!("destination contains control characters");
    }

    Ok(())
}

/// Validates the id of an existing remote item (e.g. `abc123` or `t3_abc123`).
///
/// Only ASCII alphanumerics and underscores are accepted.
pub fn validate_remote_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("id cannot be empty");
    }

    if id.len() > MAX_NAME_LENGTH {
        bail!("id too long: {} characters (max {})", id.len(), MAX_NAME_LENGTH);
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("id '{id}' contains invalid characters. Use only alphanumeric characters and underscores (_)");
    }

    Ok(())
}

/// Turns a title into a filesystem-safe slug.
///
/// Runs of non-alphanumeric characters collapse into a single dash and the
/// result is lowercased and trimmed to MAX_SLUG_LENGTH. Titles with no usable
/// characters become `untitled`.
///
/// ```
/// use outbox::validation::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  ../../etc  "), "etc");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.chars().count() > MAX_SLUG_LENGTH {
        slug = slug.chars().take(MAX_SLUG_LENGTH).collect();
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Clap value parser for destination arguments.
pub fn clap_destination_validator(s: &str) -> Result<String, String> {
    validate_destination(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}
