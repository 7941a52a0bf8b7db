use super::{
    primitives::{Add, And, Mul, Nor, Not, Or, ProtectedDiv, ProtectedSqrt, Square, Sub},
    traits::{FnPrimitive, Primitive},
};
use crate::error::{GpError, Result};
use crate::types::{DataType, Value};
use rand::RngCore;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Leading character of every minted ephemeral instance name
pub const EPHEMERAL_PREFIX: &str = "E";
/// Name of the result-producing branch
pub const RPB_NAME: &str = "MAIN";
pub const RPB_ARG_PREFIX: &str = "IN";
pub const ADF_PREFIX: &str = "F";
pub const ADF_ARG_PREFIX: &str = "A";

const GENERATED_PREFIXES: [&str; 4] = [EPHEMERAL_PREFIX, RPB_ARG_PREFIX, ADF_PREFIX, ADF_ARG_PREFIX];

/// True if `name` has the shape of a name the engine generates itself:
/// the result-producing branch, or a generated prefix followed by digits
pub fn is_generated_name(name: &str) -> bool {
    name == RPB_NAME
        || GENERATED_PREFIXES.iter().any(|prefix| {
            name.strip_prefix(*prefix)
                .map_or(false, |rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        })
}

/// A named constant leaf
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    pub name: Arc<str>,
    pub value: Value,
    pub data_type: DataType,
}

pub type EphemeralFn = dyn Fn(&mut dyn RngCore) -> Value + Send + Sync;

/// Factory for random constants, sampled once per signature and then frozen
#[derive(Clone)]
pub struct EphemeralGenerator {
    pub name: String,
    pub data_type: DataType,
    generator: Arc<EphemeralFn>,
}

impl fmt::Debug for EphemeralGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralGenerator")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .finish()
    }
}

/// A minted ephemeral. Its value never changes once created.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemeralInstance {
    pub name: Arc<str>,
    pub value: Value,
    pub data_type: DataType,
}

/// Append-only registry of the primitives, terminals and ephemeral
/// generators available to a run.
///
/// The catalog is shared read-mostly between individuals (usually behind an
/// `Arc`). Minting ephemerals only needs `&self`; the instance map sits
/// behind a mutex so concurrent growth cannot corrupt it or reuse a name.
#[derive(Default)]
pub struct PrimitiveCatalog {
    primitives: Vec<Arc<dyn Primitive>>,
    terminals: Vec<Arc<Terminal>>,
    ephemerals: Vec<EphemeralGenerator>,
    ephemeral_instances: Mutex<HashMap<Arc<str>, Value>>,
}

impl PrimitiveCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure-backed primitive
    pub fn add_primitive<F>(
        &mut self,
        name: impl Into<String>,
        input_types: Vec<DataType>,
        output_type: DataType,
        func: F,
    ) -> Result<&mut Self>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.register_primitive(Arc::new(FnPrimitive::new(name, input_types, output_type, func)))
    }

    /// Fails with `GpError::Configuration` if the name is taken or has the
    /// shape of a generated name
    pub fn register_primitive(&mut self, primitive: Arc<dyn Primitive>) -> Result<&mut Self> {
        self.check_name(primitive.name())?;
        self.primitives.push(primitive);
        Ok(self)
    }

    /// Fails with `GpError::Configuration` if the name is taken or has the
    /// shape of a generated name
    pub fn add_terminal(&mut self, name: &str, value: Value, data_type: DataType) -> Result<&mut Self> {
        self.check_name(name)?;
        self.terminals.push(Arc::new(Terminal {
            name: Arc::from(name),
            value,
            data_type,
        }));
        Ok(self)
    }

    /// Generator names label the factory only; minted instances are named
    /// `E0`, `E1`, ...
    pub fn add_ephemeral<F>(&mut self, name: impl Into<String>, data_type: DataType, generator: F) -> &mut Self
    where
        F: Fn(&mut dyn RngCore) -> Value + Send + Sync + 'static,
    {
        self.ephemerals.push(EphemeralGenerator {
            name: name.into(),
            data_type,
            generator: Arc::new(generator),
        });
        self
    }

    /// and, or, not, nor over `DataType::BOOL`
    pub fn with_boolean_primitives(&mut self) -> Result<&mut Self> {
        let primitives: Vec<Arc<dyn Primitive>> =
            vec![Arc::new(And), Arc::new(Or), Arc::new(Not), Arc::new(Nor)];
        for primitive in primitives {
            self.register_primitive(primitive)?;
        }
        Ok(self)
    }

    /// add, sub, mul, div, square, sqrt over `DataType::FLOAT`
    pub fn with_arithmetic_primitives(&mut self) -> Result<&mut Self> {
        let primitives: Vec<Arc<dyn Primitive>> = vec![
            Arc::new(Add),
            Arc::new(Sub),
            Arc::new(Mul),
            Arc::new(ProtectedDiv),
            Arc::new(Square),
            Arc::new(ProtectedSqrt),
        ];
        for primitive in primitives {
            self.register_primitive(primitive)?;
        }
        Ok(self)
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if is_generated_name(name) {
            return Err(GpError::Configuration(format!(
                "'{}' collides with generated argument, function or ephemeral names",
                name
            )));
        }
        let taken = self.primitives.iter().any(|p| p.name() == name)
            || self.terminals.iter().any(|t| t.name.as_ref() == name);
        if taken {
            return Err(GpError::Configuration(format!(
                "'{}' is already registered",
                name
            )));
        }
        Ok(())
    }

    pub fn primitives(&self) -> &[Arc<dyn Primitive>] {
        &self.primitives
    }

    pub fn terminals(&self) -> &[Arc<Terminal>] {
        &self.terminals
    }

    pub fn ephemerals(&self) -> &[EphemeralGenerator] {
        &self.ephemerals
    }

    pub fn get_by_output_type(&self, data_type: DataType) -> Vec<Arc<dyn Primitive>> {
        self.primitives
            .iter()
            .filter(|p| p.output_type() == data_type)
            .cloned()
            .collect()
    }

    pub fn get_primitive(&self, name: &str) -> Option<Arc<dyn Primitive>> {
        self.primitives.iter().find(|p| p.name() == name).cloned()
    }

    /// Sample generator `idx` and record the frozen value under a fresh name.
    ///
    /// Panics if `idx` is out of range.
    pub fn mint_ephemeral(&self, idx: usize, rng: &mut dyn RngCore) -> EphemeralInstance {
        let generator = &self.ephemerals[idx];
        let value = (generator.generator)(rng);

        let mut instances = self
            .ephemeral_instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let name: Arc<str> = Arc::from(format!("{}{}", EPHEMERAL_PREFIX, instances.len()));
        instances.insert(Arc::clone(&name), value);

        EphemeralInstance {
            name,
            value,
            data_type: generator.data_type,
        }
    }

    pub fn ephemeral_instance(&self, name: &str) -> Option<Value> {
        self.ephemeral_instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }

    pub fn ephemeral_instance_count(&self) -> usize {
        self.ephemeral_instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for PrimitiveCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.primitives.iter().map(|p| p.name()).collect();
        f.debug_struct("PrimitiveCatalog")
            .field("primitives", &names)
            .field("terminals", &self.terminals)
            .field("ephemerals", &self.ephemerals)
            .finish()
    }
}
