use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, multispace0},
    combinator::{not, peek, recognize},
    error::ParseError,
    multi::many0,
    sequence::{delimited, pair, terminated},
    IResult, Parser,
};

use super::errors::ODataParseError;

/// Wrap a parser so it tolerates surrounding whitespace.
pub fn ws<'a, O, E: ParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(multispace0, inner, multispace0)
}

/// An OData simple identifier: a letter or underscore followed by
/// letters, digits or underscores.
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// A keyword that must not run into a following identifier character,
/// so `or` never matches the prefix of `orderDate`.
pub fn keyword<'a>(
    kw: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(kw), not(peek(alt((alphanumeric1, tag("_"))))))
}

/// Decode percent-encoded option text. `+` is left alone; OData treats it
/// as a literal plus.
pub fn percent_decode(text: &str) -> Result<String, ODataParseError> {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|pair| std::str::from_utf8(pair).ok())
                .and_then(|pair| u8::from_str_radix(pair, 16).ok());
            match hex {
                Some(byte) => {
                    decoded.push(byte);
                    i += 3;
                }
                None => {
                    return Err(ODataParseError::InvalidPercentEncoding {
                        text: text.to_string(),
                    })
                }
            }
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).map_err(|_| ODataParseError::InvalidPercentEncoding {
        text: text.to_string(),
    })
}
