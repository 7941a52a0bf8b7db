use crate::functions::{EphemeralInstance, Primitive, Terminal};
use crate::types::DataType;
use std::fmt;
use std::sync::Arc;

/// Formal input of the function a tree implements (`IN0`, `A1`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentNode {
    pub name: Arc<str>,
    pub index: usize,
    pub data_type: DataType,
}

/// Call of an earlier function of the same individual
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdfNode {
    pub name: Arc<str>,
    pub index: usize,
    pub input_types: Vec<DataType>,
    pub output_type: DataType,
}

/// One entry of a pre-order encoded tree
#[derive(Clone)]
pub enum Node {
    Primitive(Arc<dyn Primitive>),
    Terminal(Arc<Terminal>),
    Ephemeral(Arc<EphemeralInstance>),
    Argument(Arc<ArgumentNode>),
    AdfCall(Arc<AdfNode>),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Primitive(p) => p.name(),
            Node::Terminal(t) => &t.name,
            Node::Ephemeral(e) => &e.name,
            Node::Argument(a) => &a.name,
            Node::AdfCall(f) => &f.name,
        }
    }

    pub fn input_types(&self) -> &[DataType] {
        match self {
            Node::Primitive(p) => p.input_types(),
            Node::AdfCall(f) => &f.input_types,
            Node::Terminal(_) | Node::Ephemeral(_) | Node::Argument(_) => &[],
        }
    }

    pub fn output_type(&self) -> DataType {
        match self {
            Node::Primitive(p) => p.output_type(),
            Node::Terminal(t) => t.data_type,
            Node::Ephemeral(e) => e.data_type,
            Node::Argument(a) => a.data_type,
            Node::AdfCall(f) => f.output_type,
        }
    }

    pub fn arity(&self) -> usize {
        self.input_types().len()
    }

    pub fn is_terminal(&self) -> bool {
        self.arity() == 0
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Node::Ephemeral(_))
    }

    /// Text used when rendering the node in a tree
    pub fn label(&self) -> String {
        match self {
            Node::Terminal(t) => t.name.to_string(),
            Node::Ephemeral(e) => e.value.to_string(),
            _ => self.name().to_string(),
        }
    }

    /// Like `label`, but ephemeral values are written in full
    pub fn key(&self) -> String {
        match self {
            Node::Ephemeral(e) => format!("{:?}", e.value),
            _ => self.label(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Node::Primitive(_) => "Primitive",
            Node::Terminal(_) => "Terminal",
            Node::Ephemeral(_) => "Ephemeral",
            Node::Argument(_) => "Argument",
            Node::AdfCall(_) => "AdfCall",
        };
        write!(
            f,
            "{}({}: {:?} -> {})",
            kind,
            self.name(),
            self.input_types(),
            self.output_type()
        )
    }
}
