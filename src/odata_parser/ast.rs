use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::edm_model::PrimitiveKind;

/// Binary operators recognized by the `$filter` grammar.
///
/// The compiler supports the logical and comparison subset; arithmetic
/// operators parse but are rejected at SQL generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Gt
                | BinaryOperator::Ge
                | BinaryOperator::Lt
                | BinaryOperator::Le
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryOperator::Or => "or",
            BinaryOperator::And => "and",
            BinaryOperator::Eq => "eq",
            BinaryOperator::Ne => "ne",
            BinaryOperator::Gt => "gt",
            BinaryOperator::Ge => "ge",
            BinaryOperator::Lt => "lt",
            BinaryOperator::Le => "le",
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Mul => "mul",
            BinaryOperator::Div => "div",
            BinaryOperator::Mod => "mod",
        };
        write!(f, "{text}")
    }
}

/// A literal value in `$filter` text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    /// Date without a time component, e.g. `1980-01-01`. Normalized to a
    /// full date-time before parameter binding.
    Date(NaiveDate),
    DateTimeOffset(DateTime<FixedOffset>),
    /// ISO 8601 duration content of a `duration'...'` literal.
    Duration(String),
    Guid(Uuid),
}

impl Literal {
    /// The EDM primitive kind this literal surfaces as, when it has one.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Literal::Null => None,
            Literal::Boolean(_) => Some(PrimitiveKind::Boolean),
            Literal::Integer(_) => Some(PrimitiveKind::Int64),
            Literal::Double(_) => Some(PrimitiveKind::Double),
            Literal::String(_) => Some(PrimitiveKind::String),
            // Date-only normalizes to date-time-with-offset.
            Literal::Date(_) => Some(PrimitiveKind::DateTimeOffset),
            Literal::DateTimeOffset(_) => Some(PrimitiveKind::DateTimeOffset),
            Literal::Duration(_) => Some(PrimitiveKind::Duration),
            Literal::Guid(_) => Some(PrimitiveKind::Guid),
        }
    }
}

/// Raw `$filter` expression, borrowed from the option text.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression<'a> {
    Binary {
        operator: BinaryOperator,
        left: Box<Expression<'a>>,
        right: Box<Expression<'a>>,
    },
    /// Property path segments, e.g. `manager/lastName` -> ["manager", "lastName"].
    PropertyPath(Vec<&'a str>),
    Literal(Literal),
    FunctionCall {
        name: &'a str,
        arguments: Vec<Expression<'a>>,
    },
}

/// One raw `$select` item.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem<'a> {
    /// `*` selects everything.
    Star,
    Path(Vec<&'a str>),
}

/// One raw `$expand` item; nested expand options are not supported.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandItem<'a> {
    pub path: Vec<&'a str>,
}

/// Sort direction of one `$orderby` item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderByDirection {
    #[default]
    Ascending,
    Descending,
}

/// One raw `$orderby` item in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem<'a> {
    pub path: Vec<&'a str>,
    pub direction: OrderByDirection,
}
