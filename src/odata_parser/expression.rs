use chrono::{DateTime, NaiveDate, NaiveDateTime};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while_m_n},
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, not, opt, peek, recognize},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};
use uuid::Uuid;

use super::ast::{BinaryOperator, Expression, Literal};
use super::common::{identifier, keyword, ws};
use super::errors::ODataParseError;

/// Parse a complete `$filter` option value. The whole input must be consumed.
pub fn parse_filter_expression(input: &str) -> Result<Expression<'_>, ODataParseError> {
    match parse_expression(input) {
        Ok((rest, expression)) if rest.trim().is_empty() => Ok(expression),
        Ok((rest, _)) => Err(ODataParseError::Syntax {
            option: "$filter",
            rest: rest.to_string(),
        }),
        Err(_) => Err(ODataParseError::Syntax {
            option: "$filter",
            rest: input.to_string(),
        }),
    }
}

pub(crate) fn parse_expression(input: &str) -> IResult<&str, Expression<'_>> {
    parse_logical_or(input)
}

fn binary<'a>(operator: BinaryOperator, left: Expression<'a>, right: Expression<'a>) -> Expression<'a> {
    Expression::Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn parse_logical_or(input: &str) -> IResult<&str, Expression<'_>> {
    let (input, lhs) = parse_logical_and(input)?;

    let mut remaining_input = input;
    let mut expression = lhs;

    loop {
        let res = preceded(ws(keyword("or")), parse_logical_and).parse(remaining_input);
        match res {
            Ok((new_input, rhs)) => {
                expression = binary(BinaryOperator::Or, expression, rhs);
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    Ok((remaining_input, expression))
}

fn parse_logical_and(input: &str) -> IResult<&str, Expression<'_>> {
    let (input, lhs) = parse_comparison(input)?;

    let mut remaining_input = input;
    let mut expression = lhs;

    loop {
        let res = preceded(ws(keyword("and")), parse_comparison).parse(remaining_input);
        match res {
            Ok((new_input, rhs)) => {
                expression = binary(BinaryOperator::And, expression, rhs);
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    Ok((remaining_input, expression))
}

// Comparisons do not chain: `a eq b eq c` is a syntax error upstream.
fn parse_comparison(input: &str) -> IResult<&str, Expression<'_>> {
    let (input, lhs) = parse_additive(input)?;
    let (input, tail) =
        opt((ws(parse_comparison_operator), parse_additive)).parse(input)?;

    match tail {
        Some((operator, rhs)) => Ok((input, binary(operator, lhs, rhs))),
        None => Ok((input, lhs)),
    }
}

fn parse_comparison_operator(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(keyword("eq"), |_| BinaryOperator::Eq),
        map(keyword("ne"), |_| BinaryOperator::Ne),
        map(keyword("ge"), |_| BinaryOperator::Ge),
        map(keyword("gt"), |_| BinaryOperator::Gt),
        map(keyword("le"), |_| BinaryOperator::Le),
        map(keyword("lt"), |_| BinaryOperator::Lt),
    ))
    .parse(input)
}

fn parse_additive(input: &str) -> IResult<&str, Expression<'_>> {
    let (input, lhs) = parse_multiplicative(input)?;

    let mut remaining_input = input;
    let mut expression = lhs;

    loop {
        let res = (
            ws(alt((
                map(keyword("add"), |_| BinaryOperator::Add),
                map(keyword("sub"), |_| BinaryOperator::Sub),
            ))),
            parse_multiplicative,
        )
            .parse(remaining_input);
        match res {
            Ok((new_input, (operator, rhs))) => {
                expression = binary(operator, expression, rhs);
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    Ok((remaining_input, expression))
}

fn parse_multiplicative(input: &str) -> IResult<&str, Expression<'_>> {
    let (input, lhs) = parse_primary(input)?;

    let mut remaining_input = input;
    let mut expression = lhs;

    loop {
        let res = (
            ws(alt((
                map(keyword("mul"), |_| BinaryOperator::Mul),
                map(keyword("div"), |_| BinaryOperator::Div),
                map(keyword("mod"), |_| BinaryOperator::Mod),
            ))),
            parse_primary,
        )
            .parse(remaining_input);
        match res {
            Ok((new_input, (operator, rhs))) => {
                expression = binary(operator, expression, rhs);
                remaining_input = new_input;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }

    Ok((remaining_input, expression))
}

fn parse_primary(input: &str) -> IResult<&str, Expression<'_>> {
    preceded(
        multispace0,
        alt((
            delimited(ws(char('(')), parse_expression, ws(char(')'))),
            map(parse_literal, Expression::Literal),
            parse_function_call,
            parse_property_path,
        )),
    )
    .parse(input)
}

fn parse_function_call(input: &str) -> IResult<&str, Expression<'_>> {
    let (input, name) = identifier(input)?;
    let (input, arguments) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), parse_expression),
        ws(char(')')),
    )
    .parse(input)?;
    Ok((input, Expression::FunctionCall { name, arguments }))
}

fn parse_property_path(input: &str) -> IResult<&str, Expression<'_>> {
    let (input, first) = identifier(input)?;
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
    Ok((remaining_input, Expression::PropertyPath(segments)))
}

pub(crate) fn parse_literal(input: &str) -> IResult<&str, Literal> {
    alt((
        map(keyword("null"), |_| Literal::Null),
        map(keyword("true"), |_| Literal::Boolean(true)),
        map(keyword("false"), |_| Literal::Boolean(false)),
        parse_string_literal,
        parse_duration_literal,
        parse_date_time_offset_literal,
        parse_date_literal,
        parse_guid_literal,
        parse_number_literal,
    ))
    .parse(input)
}

// OData strings are single-quoted and escape a quote by doubling it.
fn parse_string_literal(input: &str) -> IResult<&str, Literal> {
    let Some(stripped) = input.strip_prefix('\'') else {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    };

    let mut value = String::new();
    let mut rest = stripped;
    loop {
        match rest.find('\'') {
            None => return Err(nom::Err::Error(Error::new(input, ErrorKind::TakeUntil))),
            Some(index) => {
                value.push_str(&rest[..index]);
                let after = &rest[index + 1..];
                if let Some(after_escape) = after.strip_prefix('\'') {
                    value.push('\'');
                    rest = after_escape;
                } else {
                    return Ok((after, Literal::String(value)));
                }
            }
        }
    }
}

fn parse_duration_literal(input: &str) -> IResult<&str, Literal> {
    map(
        preceded(
            tag("duration"),
            delimited(char('\''), take_until("'"), char('\'')),
        ),
        |content: &str| Literal::Duration(content.to_string()),
    )
    .parse(input)
}

fn digits<'a>(
    count: usize,
) -> impl Parser<&'a str, Output = &'a str, Error = Error<&'a str>> {
    take_while_m_n(count, count, |c: char| c.is_ascii_digit())
}

fn hex_digits<'a>(
    count: usize,
) -> impl Parser<&'a str, Output = &'a str, Error = Error<&'a str>> {
    take_while_m_n(count, count, |c: char| c.is_ascii_hexdigit())
}

fn date_slice(input: &str) -> IResult<&str, &str> {
    recognize((digits(4), char('-'), digits(2), char('-'), digits(2))).parse(input)
}

fn parse_date_literal(input: &str) -> IResult<&str, Literal> {
    let (rest, slice) = terminated(date_slice, not(peek(char('T')))).parse(input)?;
    match NaiveDate::parse_from_str(slice, "%Y-%m-%d") {
        Ok(date) => Ok((rest, Literal::Date(date))),
        Err(_) => Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
    }
}

fn parse_date_time_offset_literal(input: &str) -> IResult<&str, Literal> {
    let (rest, slice) = recognize((
        date_slice,
        char('T'),
        digits(2),
        char(':'),
        digits(2),
        opt((char(':'), digits(2), opt((char('.'), digit1)))),
        opt(alt((
            recognize(char('Z')),
            recognize((one_of("+-"), digits(2), char(':'), digits(2))),
        ))),
    ))
    .parse(input)?;

    // UTC is assumed when the offset is omitted; seconds default to zero.
    let value = DateTime::parse_from_rfc3339(slice)
        .or_else(|_| DateTime::parse_from_rfc3339(&format!("{slice}Z")))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(slice, "%Y-%m-%dT%H:%M")
                .map(|dt| dt.and_utc().fixed_offset())
        });
    match value {
        Ok(date_time) => Ok((rest, Literal::DateTimeOffset(date_time))),
        Err(_) => Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
    }
}

fn parse_guid_literal(input: &str) -> IResult<&str, Literal> {
    let (rest, slice) = recognize((
        hex_digits(8),
        char('-'),
        hex_digits(4),
        char('-'),
        hex_digits(4),
        char('-'),
        hex_digits(4),
        char('-'),
        hex_digits(12),
    ))
    .parse(input)?;
    match Uuid::parse_str(slice) {
        Ok(guid) => Ok((rest, Literal::Guid(guid))),
        Err(_) => Err(nom::Err::Error(Error::new(input, ErrorKind::Verify))),
    }
}

fn parse_number_literal(input: &str) -> IResult<&str, Literal> {
    let (rest, slice) = recognize((
        opt(char('-')),
        digit1,
        opt((char('.'), digit1)),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)?;

    if slice.contains(['.', 'e', 'E']) {
        match slice.parse::<f64>() {
            Ok(value) => Ok((rest, Literal::Double(value))),
            Err(_) => Err(nom::Err::Error(Error::new(input, ErrorKind::Float))),
        }
    } else {
        match slice.parse::<i64>() {
            Ok(value) => Ok((rest, Literal::Integer(value))),
            Err(_) => Err(nom::Err::Error(Error::new(input, ErrorKind::Digit))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn property(name: &str) -> Expression<'_> {
        Expression::PropertyPath(vec![name])
    }

    #[test]
    fn parses_comparison_with_string_literal() {
        let expr = parse_filter_expression("lastName eq 'Doe'").unwrap();
        assert_eq!(
            expr,
            binary(
                BinaryOperator::Eq,
                property("lastName"),
                Expression::Literal(Literal::String("Doe".to_string())),
            )
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse_filter_expression("a eq 1 and b eq 2 or c eq 3").unwrap();
        let Expression::Binary { operator, left, .. } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(operator, BinaryOperator::Or);
        let Expression::Binary { operator, .. } = *left else {
            panic!("expected nested and");
        };
        assert_eq!(operator, BinaryOperator::And);
    }

    #[test]
    fn parentheses_override_precedence() {
        let expr = parse_filter_expression("a eq 1 and (b eq 2 or c eq 3)").unwrap();
        let Expression::Binary {
            operator, right, ..
        } = expr
        else {
            panic!("expected binary expression");
        };
        assert_eq!(operator, BinaryOperator::And);
        let Expression::Binary { operator, .. } = *right else {
            panic!("expected nested or");
        };
        assert_eq!(operator, BinaryOperator::Or);
    }

    #[test]
    fn or_keyword_does_not_swallow_identifiers() {
        let expr = parse_filter_expression("orderDate eq 1980-01-01").unwrap();
        let Expression::Binary { left, .. } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(*left, property("orderDate"));
    }

    #[test]
    fn parses_date_and_date_time_literals() {
        assert_eq!(
            parse_literal("1980-01-01"),
            Ok((
                "",
                Literal::Date(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap())
            ))
        );
        let (_, literal) = parse_literal("1980-01-01T12:30:00+02:00").unwrap();
        let Literal::DateTimeOffset(dt) = literal else {
            panic!("expected date-time literal");
        };
        assert_eq!(dt.offset(), &FixedOffset::east_opt(2 * 3600).unwrap());
    }

    #[test]
    fn date_time_without_offset_assumes_utc() {
        let (_, literal) = parse_literal("1980-01-01T12:30:00").unwrap();
        let Literal::DateTimeOffset(dt) = literal else {
            panic!("expected date-time literal");
        };
        assert_eq!(dt.offset(), &FixedOffset::east_opt(0).unwrap());
    }

    #[test]
    fn parses_escaped_string_literal() {
        assert_eq!(
            parse_literal("'O''Brien'"),
            Ok(("", Literal::String("O'Brien".to_string())))
        );
    }

    #[test]
    fn parses_guid_duration_and_numbers() {
        assert!(matches!(
            parse_literal("4c4e5e2b-9d2a-4a1c-8c63-1db1e1f6a5d1"),
            Ok(("", Literal::Guid(_)))
        ));
        assert_eq!(
            parse_literal("duration'P1DT2H'"),
            Ok(("", Literal::Duration("P1DT2H".to_string())))
        );
        assert_eq!(parse_literal("-42"), Ok(("", Literal::Integer(-42))));
        assert_eq!(parse_literal("3.25"), Ok(("", Literal::Double(3.25))));
    }

    #[test]
    fn parses_function_calls_and_nested_paths() {
        let expr = parse_filter_expression("contains(manager/lastName, 'Doe')").unwrap();
        let Expression::FunctionCall { name, arguments } = expr else {
            panic!("expected function call");
        };
        assert_eq!(name, "contains");
        assert_eq!(
            arguments[0],
            Expression::PropertyPath(vec!["manager", "lastName"])
        );
    }

    #[test]
    fn arithmetic_operators_parse() {
        let expr = parse_filter_expression("age add 1 gt 21").unwrap();
        let Expression::Binary { operator, left, .. } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(operator, BinaryOperator::Gt);
        let Expression::Binary { operator, .. } = *left else {
            panic!("expected arithmetic operand");
        };
        assert_eq!(operator, BinaryOperator::Add);
    }

    #[test]
    fn trailing_garbage_is_a_syntax_error() {
        assert!(matches!(
            parse_filter_expression("lastName eq 'Doe' extra"),
            Err(ODataParseError::Syntax { .. })
        ));
    }
}
