use std::collections::BTreeMap;
use std::fmt;

/// The kind of value stored in a [`Property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    String,
    Bool,
    Double,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PropertyKind::String => "string",
                PropertyKind::Bool => "bool",
                PropertyKind::Double => "double",
            }
        )
    }
}

/// A free-form value attached to a frame, an atom or a residue.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    String(String),
    Bool(bool),
    Double(f64),
}

impl Property {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Property::String(_) => PropertyKind::String,
            Property::Bool(_) => PropertyKind::Bool,
            Property::Double(_) => PropertyKind::Double,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Property::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Property::Double(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Property::String(value.to_string())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Property::String(value)
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Property::Bool(value)
    }
}

impl From<f64> for Property {
    fn from(value: f64) -> Self {
        Property::Double(value)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::String(value) => write!(f, "{}", value),
            Property::Bool(value) => write!(f, "{}", value),
            Property::Double(value) => write!(f, "{}", value),
        }
    }
}

/// String-keyed property map with a deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: BTreeMap<String, Property>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<Property>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Property::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Property::as_bool)
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Property::as_double)
    }

    pub fn remove(&mut self, name: &str) -> Option<Property> {
        self.values.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
