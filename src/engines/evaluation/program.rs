use crate::engines::generation::node::Node;
use crate::error::{GpError, Result};
use crate::types::Value;

/// One compiled tree
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    pub name: String,
    pub arity: usize,
    nodes: Vec<Node>,
}

impl CompiledFunction {
    pub fn new(name: impl Into<String>, arity: usize, nodes: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            arity,
            nodes,
        }
    }
}

/// Executable form of an individual: its functions in definition order,
/// the last one being the result-producing branch.
///
/// A function may call any function defined before it.
#[derive(Debug, Clone)]
pub struct Program {
    functions: Vec<CompiledFunction>,
}

impl Program {
    pub fn new(functions: Vec<CompiledFunction>) -> Result<Self> {
        if functions.is_empty() {
            return Err(GpError::Evaluation("program has no functions".to_string()));
        }
        for (idx, function) in functions.iter().enumerate() {
            for node in &function.nodes {
                if let Node::AdfCall(call) = node {
                    if call.index >= idx {
                        return Err(GpError::InvalidTree(format!(
                            "{} calls {} which is not defined before it",
                            function.name, call.name
                        )));
                    }
                }
            }
        }
        Ok(Self { functions })
    }

    pub fn functions(&self) -> &[CompiledFunction] {
        &self.functions
    }

    /// Run the result-producing branch
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        self.call_function(self.functions.len() - 1, args)
    }

    /// Run function `index` on `args`.
    ///
    /// Evaluates the pre-order encoding back to front with a value stack, so
    /// each node finds its children's results on top in input order.
    pub fn call_function(&self, index: usize, args: &[Value]) -> Result<Value> {
        let function = self
            .functions
            .get(index)
            .ok_or_else(|| GpError::Evaluation(format!("no function at index {}", index)))?;

        if args.len() != function.arity {
            return Err(GpError::Evaluation(format!(
                "{} takes {} argument(s), got {}",
                function.name,
                function.arity,
                args.len()
            )));
        }

        let mut stack: Vec<Value> = Vec::with_capacity(function.nodes.len());
        for node in function.nodes.iter().rev() {
            let value = match node {
                Node::Terminal(t) => t.value,
                Node::Ephemeral(e) => e.value,
                Node::Argument(a) => *args.get(a.index).ok_or_else(|| {
                    GpError::Evaluation(format!("{} reads missing argument {}", function.name, a.name))
                })?,
                Node::Primitive(p) => {
                    let operands = pop_operands(&mut stack, p.arity(), &function.name)?;
                    p.execute(&operands)
                }
                Node::AdfCall(call) => {
                    let operands = pop_operands(&mut stack, call.input_types.len(), &function.name)?;
                    self.call_function(call.index, &operands)?
                }
            };
            stack.push(value);
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(value), true) => Ok(value),
            _ => Err(GpError::InvalidTree(format!(
                "{} does not encode exactly one expression",
                function.name
            ))),
        }
    }
}

fn pop_operands(stack: &mut Vec<Value>, count: usize, function: &str) -> Result<Vec<Value>> {
    if stack.len() < count {
        return Err(GpError::InvalidTree(format!(
            "{} has a node missing {} operand(s)",
            function,
            count - stack.len()
        )));
    }
    let start = stack.len() - count;
    Ok(stack.drain(start..).rev().collect())
}
