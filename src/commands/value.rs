//! Parameter kinds and typed values for operation dispatch.
//!
//! Every operation argument belongs to one of a closed set of kinds. Each kind
//! has exactly one conversion routine from raw command text, selected by
//! matching on the [`Kind`] tag.

use std::fmt;

/// Kind of an operation parameter or result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Signed 64-bit integer, parsed base-10.
    Int,
    /// 64-bit floating-point number.
    Float,
    /// Arbitrary text, passed through unchanged.
    Text,
    /// The literals `true` or `false`.
    Bool,
}

impl Kind {
    /// Returns the display name used in help listings and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bool => "bool",
        }
    }

    /// Converts raw argument text into a value of this kind.
    ///
    /// Returns `None` when the text is not a valid literal for the kind.
    pub fn convert(&self, raw: &str) -> Option<Value> {
        match self {
            Self::Int => raw.parse::<i64>().ok().map(Value::Int),
            Self::Float => raw.parse::<f64>().ok().map(Value::Float),
            Self::Text => Some(Value::Text(raw.to_string())),
            Self::Bool => match raw {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed runtime value flowing into or out of an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Result of an operation that returns nothing.
    Unit,
}

impl Value {
    /// Returns the kind of this value, or `None` for [`Value::Unit`].
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Self::Int(_) => Some(Kind::Int),
            Self::Float(_) => Some(Kind::Float),
            Self::Text(_) => Some(Kind::Text),
            Self::Bool(_) => Some(Kind::Bool),
            Self::Unit => None,
        }
    }
}

/// Canonical textual form sent back to callers.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Unit => f.write_str("ok"),
        }
    }
}

/// A Rust type usable as an operation parameter.
pub trait FromArg: Sized {
    /// The parameter kind this type is declared as.
    const KIND: Kind;

    /// Extracts the typed value, or `None` if the value has another kind.
    fn from_value(value: Value) -> Option<Self>;
}

/// A Rust type usable as an operation result.
pub trait IntoValue {
    /// The declared result kind; `None` for operations without a result.
    const KIND: Option<Kind>;

    fn into_value(self) -> Value;
}

impl FromArg for i64 {
    const KIND: Kind = Kind::Int;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }
}

impl FromArg for f64 {
    const KIND: Kind = Kind::Float;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(x),
            _ => None,
        }
    }
}

impl FromArg for String {
    const KIND: Kind = Kind::Text;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromArg for bool {
    const KIND: Kind = Kind::Bool;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl IntoValue for i64 {
    const KIND: Option<Kind> = Some(Kind::Int);

    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for f64 {
    const KIND: Option<Kind> = Some(Kind::Float);

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for String {
    const KIND: Option<Kind> = Some(Kind::Text);

    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for bool {
    const KIND: Option<Kind> = Some(Kind::Bool);

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for () {
    const KIND: Option<Kind> = None;

    fn into_value(self) -> Value {
        Value::Unit
    }
}
