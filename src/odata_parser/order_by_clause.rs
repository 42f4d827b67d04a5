use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, opt},
    multi::separated_list1,
    sequence::preceded,
    IResult, Parser,
};

use super::ast::{OrderByDirection, OrderByItem};
use super::common::{identifier, keyword, ws};
use super::errors::ODataParseError;

/// Parse an `$orderby` option value into its raw items, in source order.
pub fn parse_order_by_clause(input: &str) -> Result<Vec<OrderByItem<'_>>, ODataParseError> {
    match separated_list1(ws(char(',')), parse_order_by_item).parse(input) {
        Ok((rest, items)) if rest.trim().is_empty() => Ok(items),
        Ok((rest, _)) => Err(ODataParseError::Syntax {
            option: "$orderby",
            rest: rest.to_string(),
        }),
        Err(_) => Err(ODataParseError::Syntax {
            option: "$orderby",
            rest: input.to_string(),
        }),
    }
}

fn parse_order_by_item(input: &str) -> IResult<&str, OrderByItem<'_>> {
    let (input, path) = parse_path(input)?;
    let (input, direction) = opt(ws(alt((
        map(keyword("asc"), |_| OrderByDirection::Ascending),
        map(keyword("desc"), |_| OrderByDirection::Descending),
    ))))
    .parse(input)?;

    Ok((
        input,
        OrderByItem {
            path,
            direction: direction.unwrap_or_default(),
        },
    ))
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
