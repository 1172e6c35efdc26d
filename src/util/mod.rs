//! Utility functions for common operations.
//!
//! - **URL policy**: which links may be opened, which upstreams may receive the key
//! - **Bodies**: size-capped reads of HTTP response bodies
//! - **Text processing**: terminal-safe sanitizing and width-aware truncation
//!
//! # Examples
//!
//! ```
//! use newsdesk::util::{display_width, truncate_to_width, validate_url_for_open};
//!
//! assert!(validate_url_for_open("https://example.com/story").is_ok());
//! assert_eq!(display_width("Hello"), 5);
//! assert_eq!(truncate_to_width("Long article title", 10), "Long ar...");
//! ```

mod body;
mod text;
mod url_validator;

pub use body::{read_limited_body, BodyError, MAX_BODY_SIZE};
pub use text::{
    clean_text, display_width, strip_control_chars, strip_truncation_marker, truncate_to_width,
};
pub use url_validator::{validate_upstream_base, validate_url_for_open, UrlValidationError};

/// Maximum search query length accepted by the search box.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
