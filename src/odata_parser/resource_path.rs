use super::errors::ODataParseError;

/// Extract the entity set segment from a relative resource path.
///
/// Absolute URIs and anything other than a single path segment are rejected;
/// key segments (`persons(1)`) and multi-segment paths are outside the
/// supported surface.
pub(crate) fn parse_resource_path(uri: &str, path: &str) -> Result<String, ODataParseError> {
    let trimmed = path.trim_start_matches('/');
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(ODataParseError::InvalidRelativeReference {
            uri: uri.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// A URI is absolute when it starts with a scheme (RFC 3986). A colon only
/// counts when it appears before any `/`, `?` or `#`.
pub(crate) fn is_absolute(uri: &str) -> bool {
    let head = uri
        .find(['/', '?', '#'])
        .map_or(uri, |index| &uri[..index]);
    let Some(colon) = head.find(':') else {
        return false;
    };
    let scheme = &head[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
