use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag attached to every node input and output.
///
/// Two types match only when their tags are identical; there is no
/// subtyping and no coercion between tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DataType(&'static str);

impl DataType {
    pub const BOOL: DataType = DataType("bool");
    pub const INT: DataType = DataType("int");
    pub const FLOAT: DataType = DataType("float");

    /// Create a domain-specific tag, e.g. `DataType::new("point")`.
    pub const fn new(tag: &'static str) -> Self {
        Self(tag)
    }

    pub fn tag(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Runtime value flowing through a compiled program
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl Value {
    pub fn as_bool(&self) -> bool {
        match *self {
            Value::Bool(b) => b,
            Value::Integer(i) => i != 0,
            Value::Float(f) => f != 0.0,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match *self {
            Value::Bool(b) => b as i64,
            Value::Integer(i) => i,
            Value::Float(f) => f as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Integer(i) => i as f64,
            Value::Float(f) => f,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:.4}", x),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Fitness tuple. Element 0 is the primary objective and lower is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fitness(pub Vec<f64>);

impl Fitness {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn single(value: f64) -> Self {
        Self(vec![value])
    }

    /// Primary (minimised) objective; an empty tuple counts as the worst value.
    pub fn primary(&self) -> f64 {
        self.0.first().copied().unwrap_or(f64::INFINITY)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl From<f64> for Fitness {
    fn from(value: f64) -> Self {
        Fitness::single(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_coercions() {
        assert!(Value::Integer(3).as_bool());
        assert_eq!(Value::Bool(true).as_f64(), 1.0);
        assert_eq!(Value::Float(2.9).as_i64(), 2);
    }

    #[test]
    fn test_fitness_primary() {
        assert_eq!(Fitness::new(vec![2.0, 7.0]).primary(), 2.0);
        assert_eq!(Fitness::new(vec![]).primary(), f64::INFINITY);
    }

    #[test]
    fn test_custom_type_tags() {
        let point = DataType::new("point");
        assert_eq!(point, DataType::new("point"));
        assert_ne!(point, DataType::FLOAT);
    }
}
