use thiserror::Error;
use url::Url;

/// Errors from URL policy checks.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The upstream base uses plain HTTP on a non-local host.
    #[error("Insecure upstream URL: HTTPS required (except localhost for testing)")]
    InsecureUpstream,
}

/// Validates an article link before handing it to the system browser.
///
/// `open::that` passes its argument to a platform launcher, so anything that
/// is not a plain http(s) URL (`file://`, `javascript:`, command-looking
/// strings) is refused.
///
/// ```
/// use newsdesk::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://example.com/story").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// Validates the upstream API base the relay sends the credential to.
///
/// HTTPS is required so the key never travels in clear text. Plain HTTP is
/// tolerated for `localhost`/`127.0.0.1`, which is what tests mock against.
pub fn validate_upstream_base(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;
    match url.scheme() {
        "https" => Ok(url),
        "http" => match url.host_str() {
            Some("localhost") | Some("127.0.0.1") | Some("[::1]") => {
                tracing::warn!(upstream = %url, "Using non-HTTPS upstream (localhost only)");
                Ok(url)
            }
            _ => Err(UrlValidationError::InsecureUpstream),
        },
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}
