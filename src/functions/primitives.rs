use super::traits::Primitive;
use crate::types::{DataType, Value};

const BOOL_1: &[DataType] = &[DataType::BOOL];
const BOOL_2: &[DataType] = &[DataType::BOOL, DataType::BOOL];
const FLOAT_1: &[DataType] = &[DataType::FLOAT];
const FLOAT_2: &[DataType] = &[DataType::FLOAT, DataType::FLOAT];

// --- Logical operators ---
pub struct And;
impl Primitive for And {
    fn name(&self) -> &str { "and" }
    fn input_types(&self) -> &[DataType] { BOOL_2 }
    fn output_type(&self) -> DataType { DataType::BOOL }
    fn execute(&self, args: &[Value]) -> Value {
        Value::Bool(args[0].as_bool() && args[1].as_bool())
    }
}

pub struct Or;
impl Primitive for Or {
    fn name(&self) -> &str { "or" }
    fn input_types(&self) -> &[DataType] { BOOL_2 }
    fn output_type(&self) -> DataType { DataType::BOOL }
    fn execute(&self, args: &[Value]) -> Value {
        Value::Bool(args[0].as_bool() || args[1].as_bool())
    }
}

pub struct Not;
impl Primitive for Not {
    fn name(&self) -> &str { "not" }
    fn input_types(&self) -> &[DataType] { BOOL_1 }
    fn output_type(&self) -> DataType { DataType::BOOL }
    fn execute(&self, args: &[Value]) -> Value {
        Value::Bool(!args[0].as_bool())
    }
}

/// not(a or b); functionally complete on its own
pub struct Nor;
impl Primitive for Nor {
    fn name(&self) -> &str { "nor" }
    fn input_types(&self) -> &[DataType] { BOOL_2 }
    fn output_type(&self) -> DataType { DataType::BOOL }
    fn execute(&self, args: &[Value]) -> Value {
        Value::Bool(!(args[0].as_bool() || args[1].as_bool()))
    }
}

// --- Arithmetic ---
pub struct Add;
impl Primitive for Add {
    fn name(&self) -> &str { "add" }
    fn input_types(&self) -> &[DataType] { FLOAT_2 }
    fn output_type(&self) -> DataType { DataType::FLOAT }
    fn execute(&self, args: &[Value]) -> Value {
        Value::Float(args[0].as_f64() + args[1].as_f64())
    }
}

pub struct Sub;
impl Primitive for Sub {
    fn name(&self) -> &str { "sub" }
    fn input_types(&self) -> &[DataType] { FLOAT_2 }
    fn output_type(&self) -> DataType { DataType::FLOAT }
    fn execute(&self, args: &[Value]) -> Value {
        Value::Float(args[0].as_f64() - args[1].as_f64())
    }
}

pub struct Mul;
impl Primitive for Mul {
    fn name(&self) -> &str { "mul" }
    fn input_types(&self) -> &[DataType] { FLOAT_2 }
    fn output_type(&self) -> DataType { DataType::FLOAT }
    fn execute(&self, args: &[Value]) -> Value {
        Value::Float(args[0].as_f64() * args[1].as_f64())
    }
}

/// Division returning 1.0 when the divisor is zero
pub struct ProtectedDiv;
impl Primitive for ProtectedDiv {
    fn name(&self) -> &str { "div" }
    fn input_types(&self) -> &[DataType] { FLOAT_2 }
    fn output_type(&self) -> DataType { DataType::FLOAT }
    fn execute(&self, args: &[Value]) -> Value {
        let divisor = args[1].as_f64();
        if divisor == 0.0 {
            Value::Float(1.0)
        } else {
            Value::Float(args[0].as_f64() / divisor)
        }
    }
}

pub struct Square;
impl Primitive for Square {
    fn name(&self) -> &str { "square" }
    fn input_types(&self) -> &[DataType] { FLOAT_1 }
    fn output_type(&self) -> DataType { DataType::FLOAT }
    fn execute(&self, args: &[Value]) -> Value {
        let x = args[0].as_f64();
        Value::Float(x * x)
    }
}

/// Square root of the absolute value
pub struct ProtectedSqrt;
impl Primitive for ProtectedSqrt {
    fn name(&self) -> &str { "sqrt" }
    fn input_types(&self) -> &[DataType] { FLOAT_1 }
    fn output_type(&self) -> DataType { DataType::FLOAT }
    fn execute(&self, args: &[Value]) -> Value {
        Value::Float(args[0].as_f64().abs().sqrt())
    }
}
