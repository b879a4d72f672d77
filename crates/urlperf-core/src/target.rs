use crate::{Error, Result};
use url::Url;

pub const INVALID_URL_MESSAGE: &str = "Invalid URL format. Please enter a valid HTTP or HTTPS URL.";

/// Check that a string parses as an absolute http or https URL
pub fn is_valid_url(input: &str) -> bool {
    Url::parse(input).is_ok_and(|url| is_http_scheme(&url))
}

/// Normalize user input into a URL string.
///
/// Parseable input is re-serialized (which adds a trailing slash to bare
/// hosts), so `ftp://host` stays an ftp URL and later fails validation.
/// Input without an `http://` or `https://` prefix gets `https://` prepended.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();

    if let Ok(url) = Url::parse(trimmed) {
        // "example.com:8080" parses with scheme "example.com"
        if is_http_scheme(&url) || trimmed.contains("://") {
            return url.to_string();
        }
    }

    if has_http_prefix(trimmed) {
        return trimmed.to_string();
    }

    let prefixed = format!("https://{}", trimmed);
    match Url::parse(&prefixed) {
        Ok(url) => url.to_string(),
        Err(_) => prefixed,
    }
}

/// Strictly parse an http(s) URL without any normalization
pub fn parse_http_url(input: &str) -> Result<Url> {
    let url = Url::parse(input).map_err(|e| {
        tracing::debug!("Rejecting URL {:?}: {}", input, e);
        Error::InvalidUrl(INVALID_URL_MESSAGE.to_string())
    })?;

    if !is_http_scheme(&url) {
        tracing::debug!("Rejecting URL {:?}: scheme {}", input, url.scheme());
        return Err(Error::InvalidUrl(INVALID_URL_MESSAGE.to_string()));
    }

    Ok(url)
}

/// Normalize user input and validate the result
pub fn validate(input: &str) -> Result<Url> {
    if input.trim().is_empty() {
        return Err(Error::InvalidUrl("Please enter a URL".to_string()));
    }

    let normalized = normalize_url(input);
    if !is_valid_url(&normalized) {
        tracing::debug!("Rejecting URL {:?} (normalized to {:?})", input, normalized);
        return Err(Error::InvalidUrl(INVALID_URL_MESSAGE.to_string()));
    }

    parse_http_url(&normalized)
}

/// Hostname shown in headings and comparison columns
pub fn display_host(input: &str) -> String {
    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| input.to_string())
}

fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn has_http_prefix(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
