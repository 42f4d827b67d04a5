use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::char,
    combinator::{map, opt},
    multi::separated_list1,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use super::ast::{ExpandItem, SelectItem};
use super::common::{identifier, ws};
use super::errors::ODataParseError;

/// Parse a `$select` option value into its raw items.
pub fn parse_select_clause(input: &str) -> Result<Vec<SelectItem<'_>>, ODataParseError> {
    match separated_list1(ws(char(',')), parse_select_item).parse(input) {
        Ok((rest, items)) if rest.trim().is_empty() => Ok(items),
        Ok((rest, _)) => Err(ODataParseError::Syntax {
            option: "$select",
            rest: rest.to_string(),
        }),
        Err(_) => Err(ODataParseError::Syntax {
            option: "$select",
            rest: input.to_string(),
        }),
    }
}

fn parse_select_item(input: &str) -> IResult<&str, SelectItem<'_>> {
    alt((
        map(ws(char('*')), |_| SelectItem::Star),
        map(parse_path, SelectItem::Path),
    ))
    .parse(input)
}

/// Parse an `$expand` option value. A parenthesized nested-option block after
/// an item is consumed but not interpreted; expand items never contribute
/// query text and fail compilation only alongside a narrowing `$select`.
pub fn parse_expand_clause(input: &str) -> Result<Vec<ExpandItem<'_>>, ODataParseError> {
    let item = map(
        (parse_path, opt(delimited(char('('), opt(is_not(")")), char(')')))),
        |(path, _)| ExpandItem { path },
    );
    match separated_list1(ws(char(',')), item).parse(input) {
        Ok((rest, items)) if rest.trim().is_empty() => Ok(items),
        Ok((rest, _)) => Err(ODataParseError::Syntax {
            option: "$expand",
            rest: rest.to_string(),
        }),
        Err(_) => Err(ODataParseError::Syntax {
            option: "$expand",
            rest: input.to_string(),
        }),
    }
}

fn parse_path(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, first) = ws(identifier).parse(input)?;
    let mut segments = vec![first];
    let mut remaining_input = input;
    loop {
        match preceded(char('/'), identifier).parse(remaining_input) {
            Ok((new_input, segment)) => {
                segments.push(segment);
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok((remaining_input, segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_paths() {
        let items = parse_select_clause("firstName,lastName").unwrap();
        assert_eq!(
            items,
            vec![
                SelectItem::Path(vec!["firstName"]),
                SelectItem::Path(vec!["lastName"]),
            ]
        );
    }

    #[test]
    fn parses_star_and_nested_paths() {
        let items = parse_select_clause("*, manager/lastName").unwrap();
        assert_eq!(
            items,
            vec![
                SelectItem::Star,
                SelectItem::Path(vec!["manager", "lastName"]),
            ]
        );
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_select_clause("firstName,").is_err());
    }

    #[test]
    fn expand_consumes_nested_options() {
        let items = parse_expand_clause("manager($select=lastName)").unwrap();
        assert_eq!(
            items,
            vec![ExpandItem {
                path: vec!["manager"]
            }]
        );
    }
}
