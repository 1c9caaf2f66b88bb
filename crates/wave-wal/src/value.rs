//! Runtime values produced by the evaluator

use std::cmp::Ordering;
use std::fmt;

use crate::reader::Expr;

/// The result of evaluating a WAL form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Short type name shown next to results.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Nil => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(v) => *v != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric view; booleans count as 0/1.
    pub(crate) fn number(&self) -> Option<Number> {
        match self {
            Self::Int(n) => Some(Number::Int(*n)),
            Self::Float(v) => Some(Number::Float(*v)),
            Self::Bool(b) => Some(Number::Int(i64::from(*b))),
            _ => None,
        }
    }

    /// WAL equality: numbers compare by value across int/float, everything
    /// else structurally.
    pub fn wal_eq(&self, other: &Value) -> bool {
        match (self.number(), other.number()) {
            (Some(a), Some(b)) => a.cmp_with(b) == Some(Ordering::Equal),
            _ => match (self, other) {
                (Self::List(a), Self::List(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.wal_eq(y))
                }
                _ => self == other,
            },
        }
    }

    /// Convert a recorded signal value. Binary values become integers,
    /// anything carrying `x`/`z` stays a string.
    pub fn from_signal(value: &wave_trace::Value) -> Self {
        match value {
            wave_trace::Value::Real(v) => Self::Float(*v),
            wave_trace::Value::Bits(bits) => match value.as_u64().map(i64::try_from) {
                Some(Ok(n)) => Self::Int(n),
                _ => Self::Str(bits.clone()),
            },
        }
    }

    /// Quoted data: symbols become strings, lists stay lists.
    pub(crate) fn from_quoted(expr: &Expr) -> Self {
        match expr {
            Expr::Int(n) => Self::Int(*n),
            Expr::Float(v) => Self::Float(*v),
            Expr::Str(s) | Expr::Symbol(s) => Self::Str(s.clone()),
            Expr::Bool(b) => Self::Bool(*b),
            Expr::List(items) => Self::List(items.iter().map(Self::from_quoted).collect()),
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(true) => f.write_str("#t"),
            Self::Bool(false) => f.write_str("#f"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(v) => v,
        }
    }

    pub(crate) fn cmp_with(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(n) => Value::Int(n),
            Number::Float(v) => Value::Float(v),
        }
    }
}
