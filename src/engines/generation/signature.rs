use super::node::{AdfNode, ArgumentNode, Node};
use crate::config::AdfConfig;
use crate::functions::PrimitiveCatalog;
use crate::types::DataType;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Input/output types of one function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Contract {
    pub input_types: Vec<DataType>,
    pub output_type: DataType,
}

impl Contract {
    pub fn new(input_types: Vec<DataType>, output_type: DataType) -> Self {
        Self {
            input_types,
            output_type,
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs: Vec<&str> = self.input_types.iter().map(|t| t.tag()).collect();
        write!(f, "({}) -> {}", inputs.join(", "), self.output_type)
    }
}

/// The typed vocabulary available while growing one tree: formal
/// arguments, catalog primitives and terminals, one frozen sample per
/// ephemeral generator, and calls to the earlier functions of the same
/// individual.
pub struct Signature {
    name: Arc<str>,
    contract: Contract,
    arguments: Vec<Node>,
    primitives: HashMap<DataType, Vec<Node>>,
    terminals: HashMap<DataType, Vec<Node>>,
    mapping: HashMap<Arc<str>, Node>,
}

impl Signature {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn input_types(&self) -> &[DataType] {
        &self.contract.input_types
    }

    pub fn output_type(&self) -> DataType {
        self.contract.output_type
    }

    pub fn arguments(&self) -> &[Node] {
        &self.arguments
    }

    pub fn primitives_of(&self, data_type: DataType) -> &[Node] {
        self.primitives.get(&data_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Terminals, ephemeral samples and arguments producing `data_type`
    pub fn terminals_of(&self, data_type: DataType) -> &[Node] {
        self.terminals.get(&data_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn lookup(&self, name: &str) -> Option<&Node> {
        self.mapping.get(name)
    }

    /// The node this signature would use in place of a foreign `node`, if
    /// the two agree.
    ///
    /// Ephemeral samples carry their value and are always accepted as is.
    /// Anything else needs a local node of the same name with the same
    /// input types and output type.
    pub fn localize(&self, node: &Node) -> Option<Node> {
        if node.is_ephemeral() {
            return Some(node.clone());
        }
        let local = self.mapping.get(node.name())?;
        if local.output_type() == node.output_type() && local.input_types() == node.input_types() {
            Some(local.clone())
        } else {
            None
        }
    }

    pub fn accepts(&self, node: &Node) -> bool {
        self.localize(node).is_some()
    }

    fn insert(&mut self, node: Node) {
        let bucket = if node.is_terminal() {
            &mut self.terminals
        } else {
            &mut self.primitives
        };
        bucket.entry(node.output_type()).or_default().push(node.clone());
        self.mapping.insert(Arc::from(node.name()), node);
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("name", &self.name)
            .field("contract", &self.contract)
            .field("vocabulary", &self.mapping.len())
            .finish()
    }
}

/// Builds signatures against a catalog
pub struct SignatureBuilder<'a> {
    catalog: &'a PrimitiveCatalog,
}

impl<'a> SignatureBuilder<'a> {
    pub fn new(catalog: &'a PrimitiveCatalog) -> Self {
        Self { catalog }
    }

    /// Snapshot the catalog into a new signature.
    ///
    /// Mints exactly one instance per ephemeral generator and exposes every
    /// signature in `previous` as a callable of its recorded contract.
    /// Arguments are named `prefix` followed by their position.
    pub fn build<R: Rng>(
        &self,
        name: &str,
        contract: Contract,
        prefix: &str,
        previous: &[Arc<Signature>],
        rng: &mut R,
    ) -> Signature {
        let mut signature = Signature {
            name: Arc::from(name),
            contract,
            arguments: Vec::new(),
            primitives: HashMap::new(),
            terminals: HashMap::new(),
            mapping: HashMap::new(),
        };

        for terminal in self.catalog.terminals() {
            signature.insert(Node::Terminal(Arc::clone(terminal)));
        }
        for idx in 0..self.catalog.ephemerals().len() {
            let instance = self.catalog.mint_ephemeral(idx, rng);
            signature.insert(Node::Ephemeral(Arc::new(instance)));
        }
        for primitive in self.catalog.primitives() {
            signature.insert(Node::Primitive(Arc::clone(primitive)));
        }
        for (index, adf) in previous.iter().enumerate() {
            signature.insert(Node::AdfCall(Arc::new(AdfNode {
                name: Arc::clone(&adf.name),
                index,
                input_types: adf.contract.input_types.clone(),
                output_type: adf.contract.output_type,
            })));
        }

        let input_types = signature.contract.input_types.clone();
        for (index, data_type) in input_types.into_iter().enumerate() {
            let argument = Node::Argument(Arc::new(ArgumentNode {
                name: Arc::from(format!("{}{}", prefix, index)),
                index,
                data_type,
            }));
            signature.arguments.push(argument.clone());
            signature.insert(argument);
        }

        signature
    }

    /// Draw a contract for a flexible signature.
    ///
    /// The output type is uniform over the distinct outputs of the catalog
    /// primitives and earlier functions, each input uniform over the
    /// distinct input types of the same. Returns `None` when the catalog
    /// offers no types to draw from.
    pub fn random_contract<R: Rng>(
        &self,
        previous: &[Arc<Signature>],
        adf: &AdfConfig,
        rng: &mut R,
    ) -> Option<Contract> {
        let mut outputs: Vec<DataType> = Vec::new();
        let mut inputs: Vec<DataType> = Vec::new();

        let primitive_types = self
            .catalog
            .primitives()
            .iter()
            .map(|p| (p.input_types(), p.output_type()));
        let adf_types = previous
            .iter()
            .map(|s| (s.input_types(), s.output_type()));

        for (ins, out) in primitive_types.chain(adf_types) {
            if !outputs.contains(&out) {
                outputs.push(out);
            }
            for t in ins {
                if !inputs.contains(t) {
                    inputs.push(*t);
                }
            }
        }

        let output_type = *outputs.choose(rng)?;
        let count = rng.gen_range(adf.min_args..=adf.max_args);
        let input_types = (0..count)
            .map(|_| inputs.choose(rng).copied())
            .collect::<Option<Vec<_>>>()?;

        Some(Contract::new(input_types, output_type))
    }
}
