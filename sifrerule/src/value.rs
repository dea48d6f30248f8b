//! Typed SQL values flowing through value transformation.
//!
//! SQL `NULL` is not a variant: batches are `[Option<Value>]` and `None`
//! passes through every transformation untouched.

use std::borrow::Cow;
use std::fmt;

/// A non-null SQL literal or bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// Character data
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns the bytes an algorithm encrypts for this value.
    ///
    /// Numbers and booleans are encoded as their decimal text so that `123`
    /// and `'123'` produce the same ciphertext, which keeps assisted-query
    /// equality predicates independent of how the client typed a literal.
    #[must_use]
    pub fn to_plain_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Bool(b) => Cow::Owned(b.to_string().into_bytes()),
            Self::Int(i) => Cow::Owned(i.to_string().into_bytes()),
            Self::Float(f) => Cow::Owned(f.to_string().into_bytes()),
            Self::Text(s) => Cow::Borrowed(s.as_bytes()),
            Self::Bytes(b) => Cow::Borrowed(b),
        }
    }

    /// Returns the text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Builds a value from decrypted bytes: text when valid UTF-8, raw bytes otherwise.
    #[must_use]
    pub fn from_plain_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(s) => Self::Text(s),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}
