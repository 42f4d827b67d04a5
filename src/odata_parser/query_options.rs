use super::common::percent_decode;
use super::errors::ODataParseError;
use super::resource_path::{is_absolute, parse_resource_path};

/// A split and percent-decoded relative OData URI.
///
/// Option values hold the raw decoded text; the grammar parsers and the
/// binder take it from here. Empty option values count as absent, and
/// options outside the supported set are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ODataUri {
    pub entity_set: String,
    pub select: Option<String>,
    pub expand: Option<String>,
    pub filter: Option<String>,
    pub order_by: Option<String>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub count: Option<bool>,
}

/// Split a relative URI of the form
/// `/<entitySet>?$select=...&$filter=...&$orderby=...&$top=...&$skip=...`
/// into its decoded parts.
pub fn parse_relative_uri(relative_uri: &str) -> Result<ODataUri, ODataParseError> {
    if is_absolute(relative_uri) {
        return Err(ODataParseError::InvalidRelativeReference {
            uri: relative_uri.to_string(),
        });
    }

    let (path, query) = match relative_uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (relative_uri, None),
    };

    let mut uri = ODataUri {
        entity_set: parse_resource_path(relative_uri, path)?,
        ..ODataUri::default()
    };

    for pair in query.into_iter().flat_map(|q| q.split('&')) {
        if pair.is_empty() {
            continue;
        }
        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name, value),
            None => (pair, ""),
        };
        let value = percent_decode(value)?;
        if value.is_empty() {
            continue;
        }
        match name {
            "$select" => uri.select = Some(value),
            "$expand" => uri.expand = Some(value),
            "$filter" => uri.filter = Some(value),
            "$orderby" => uri.order_by = Some(value),
            "$top" => uri.top = Some(parse_unsigned("$top", &value)?),
            "$skip" => uri.skip = Some(parse_unsigned("$skip", &value)?),
            "$count" => uri.count = Some(parse_boolean("$count", &value)?),
            // Unrecognized options are ignored.
            _ => {}
        }
    }

    Ok(uri)
}

fn parse_unsigned(option: &'static str, value: &str) -> Result<u64, ODataParseError> {
    value
        .parse::<u64>()
        .map_err(|_| ODataParseError::InvalidOptionValue {
            option,
            value: value.to_string(),
        })
}

fn parse_boolean(option: &'static str, value: &str) -> Result<bool, ODataParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ODataParseError::InvalidOptionValue {
            option,
            value: value.to_string(),
        }),
    }
}
