use crate::types::{DataType, Value};
use std::fmt;
use std::sync::Arc;

/// A typed function node.
///
/// A primitive with `k` input types becomes a tree node with exactly `k`
/// children, each producing the corresponding input type.
pub trait Primitive: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn input_types(&self) -> &[DataType];
    fn output_type(&self) -> DataType;
    fn execute(&self, args: &[Value]) -> Value;

    fn arity(&self) -> usize {
        self.input_types().len()
    }
}

pub type PrimitiveFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Primitive backed by a closure, as registered through `PrimitiveCatalog::add_primitive`
#[derive(Clone)]
pub struct FnPrimitive {
    name: String,
    input_types: Vec<DataType>,
    output_type: DataType,
    func: Arc<PrimitiveFn>,
}

impl FnPrimitive {
    pub fn new<F>(name: impl Into<String>, input_types: Vec<DataType>, output_type: DataType, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            input_types,
            output_type,
            func: Arc::new(func),
        }
    }
}

impl Primitive for FnPrimitive {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_types(&self) -> &[DataType] {
        &self.input_types
    }

    fn output_type(&self) -> DataType {
        self.output_type
    }

    fn execute(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for FnPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPrimitive")
            .field("name", &self.name)
            .field("input_types", &self.input_types)
            .field("output_type", &self.output_type)
            .finish()
    }
}
