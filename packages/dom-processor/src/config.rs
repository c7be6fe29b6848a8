//! Configuration constants and validation functions for the processor.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ProcessorError, Result};

/// Tag specifier matching any element.
pub const WILDCARD_SPECIFIER: &str = "*";

/// Tag specifier matching only the document element of the owning document.
pub const ROOT_SPECIFIER: &str = "/";

/// Maximum XML input size in bytes (50 MB).
///
/// The whole input is held in memory twice while loading (source text and
/// arena), so the CLI refuses anything larger.
pub const MAX_INPUT_SIZE: usize = 50 * 1024 * 1024;

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// XML name, without namespace prefix handling.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TAG_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-:]*$").expect("valid regex"));

/// Validate a tag name given on the command line.
///
/// # Examples
/// ```
/// use dom_processor::config::validate_tag_name;
///
/// assert!(validate_tag_name("li.nr").is_ok());
/// assert!(validate_tag_name("meta-data").is_ok());
/// assert!(validate_tag_name("1abc").is_err());
/// ```
pub fn validate_tag_name(tag_name: &str) -> Result<()> {
    if TAG_NAME_PATTERN.is_match(tag_name) {
        Ok(())
    } else {
        Err(ProcessorError::InvalidTagName(tag_name.to_string()))
    }
}

/// Parse a `FROM=TO` rename argument into its two validated tag names.
///
/// # Examples
/// ```
/// use dom_processor::config::parse_rename;
///
/// let (from, to) = parse_rename("nadruk=em").unwrap();
/// assert_eq!(from, "nadruk");
/// assert_eq!(to, "em");
/// assert!(parse_rename("nadruk").is_err());
/// ```
pub fn parse_rename(arg: &str) -> Result<(String, String)> {
    let (from, to) = arg
        .split_once('=')
        .ok_or_else(|| ProcessorError::InvalidRename(arg.to_string()))?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(ProcessorError::InvalidRename(arg.to_string()));
    }
    validate_tag_name(from)?;
    validate_tag_name(to)?;
    Ok((from.to_string(), to.to_string()))
}

/// Check the size of an input before loading it.
pub fn check_input_size(size: usize) -> Result<()> {
    if size > MAX_INPUT_SIZE {
        return Err(ProcessorError::InputTooLarge {
            size,
            max: MAX_INPUT_SIZE,
        });
    }
    Ok(())
}
