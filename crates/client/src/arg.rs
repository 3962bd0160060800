//! Dynamically-typed call arguments
//!
//! Callers of the admin surface pass `Arg` values rather than the
//! engine's strong types, mirroring what a wire decoder or language
//! binding produces. `Int` is i128 on purpose: a caller can hand over
//! a number beyond u64 and the guards must classify it as a range
//! error rather than fail to represent it.

use std::collections::HashMap;

/// A loosely-typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Absent / nil
    Null,
    /// Boolean
    Bool(bool),
    /// Integer; wide enough to hold values outside u64
    Int(i128),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered list
    List(Vec<Arg>),
    /// String-keyed map (policy dictionaries arrive as this)
    Map(HashMap<String, Arg>),
}

impl Arg {
    /// The type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Null => "null",
            Arg::Bool(_) => "bool",
            Arg::Int(_) => "int",
            Arg::Float(_) => "float",
            Arg::Text(_) => "text",
            Arg::Bytes(_) => "bytes",
            Arg::List(_) => "list",
            Arg::Map(_) => "map",
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<i128> for Arg {
    fn from(n: i128) -> Self {
        Arg::Int(n)
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n as i128)
    }
}

impl From<u64> for Arg {
    fn from(n: u64) -> Self {
        Arg::Int(n as i128)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Arg::Null.type_name(), "null");
        assert_eq!(Arg::Bool(true).type_name(), "bool");
        assert_eq!(Arg::Int(0).type_name(), "int");
        assert_eq!(Arg::Float(1.5).type_name(), "float");
        assert_eq!(Arg::from("x").type_name(), "text");
        assert_eq!(Arg::Bytes(vec![]).type_name(), "bytes");
        assert_eq!(Arg::List(vec![]).type_name(), "list");
        assert_eq!(Arg::Map(HashMap::new()).type_name(), "map");
    }

    #[test]
    fn test_int_holds_values_beyond_u64() {
        let over = Arg::Int(u64::MAX as i128 + 1);
        assert_eq!(over.type_name(), "int");
        assert_eq!(Arg::from(u64::MAX), Arg::Int(u64::MAX as i128));
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Arg::from("ns"), Arg::Text("ns".to_string()));
        assert_eq!(Arg::from(7i64), Arg::Int(7));
        assert_eq!(Arg::from(true), Arg::Bool(true));
    }
}
