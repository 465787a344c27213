//! Domain entities: element payloads

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::arena::NodeId;

/// Text content of a leaf element.
///
/// Numbers keep their type so they render in plain decimal form:
/// `555` stays `555`, `9.99` stays `9.99`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// The single `name="value"` attribute an element may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for Attribute {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

/// Construction arguments for a new element: tag plus optional attribute and value.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub tag: String,
    pub attribute: Option<Attribute>,
    pub value: Option<Value>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attribute: None,
            value: None,
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute = Some(Attribute::new(name, value));
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl From<&str> for ElementSpec {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for ElementSpec {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

/// One XML element stored in the arena.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attribute: Option<Attribute>,
    pub value: Option<Value>,
    /// Owning parent, None for a tree root or a detached standalone node
    pub parent: Option<NodeId>,
    /// Root of the tree this element belongs to (itself when parentless)
    pub root: NodeId,
    pub is_root: bool,
    /// Children in insertion order; positions define paths
    pub children: Vec<NodeId>,
}
