use super::grower::{uses_all_arguments, TreeGrower};
use super::node::Node;
use super::signature::{Contract, Signature, SignatureBuilder};
use super::tree::Tree;
use crate::config::{AdfConfig, GrowthConfig};
use crate::engines::evaluation::{CompiledFunction, Program};
use crate::error::{GpError, Result};
use crate::functions::registry::{ADF_ARG_PREFIX, ADF_PREFIX, RPB_ARG_PREFIX, RPB_NAME};
use crate::functions::PrimitiveCatalog;
use crate::types::{DataType, Fitness, Value};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A program made of zero or more automatically defined functions followed
/// by one result-producing branch.
///
/// Each tree is paired with the signature it was grown from. A function can
/// only call functions defined before it. Fitness is a cache: structural
/// changes reset it, cloning keeps it.
#[derive(Clone)]
pub struct Individual {
    trees: Vec<Tree>,
    signatures: Vec<Arc<Signature>>,
    fitness: Option<Fitness>,
}

impl Individual {
    /// Grow a new individual.
    ///
    /// Draws the number of ADFs from `0..=adf.max_adfs`, each with a random
    /// contract, then grows the result-producing branch with the fixed
    /// `contract`. Fails with `GpError::Grow` when any tree cannot be grown
    /// within the configured retry bounds.
    pub fn new<R: Rng>(
        catalog: &PrimitiveCatalog,
        contract: &Contract,
        growth: &GrowthConfig,
        adf: &AdfConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let mut individual = Self {
            trees: Vec::new(),
            signatures: Vec::new(),
            fitness: None,
        };
        let builder = SignatureBuilder::new(catalog);
        let grower = TreeGrower::new(growth.terminal_probability);

        let adf_count = rng.gen_range(0..=adf.max_adfs);
        for idx in 0..adf_count {
            let name = format!("{}{}", ADF_PREFIX, idx);
            individual.add_flexible_function(&name, &builder, &grower, growth, adf, rng)?;
        }

        let signature = builder.build(
            RPB_NAME,
            contract.clone(),
            RPB_ARG_PREFIX,
            &individual.signatures,
            rng,
        );
        let tree = grower
            .grow_tree(&signature, growth.max_init_depth, growth.max_attempts, rng)
            .ok_or_else(|| {
                GpError::Grow(format!(
                    "no valid {} {} after {} attempts",
                    RPB_NAME, contract, growth.max_attempts
                ))
            })?;
        individual.push(tree, signature);

        Ok(individual)
    }

    fn add_flexible_function<R: Rng>(
        &mut self,
        name: &str,
        builder: &SignatureBuilder<'_>,
        grower: &TreeGrower,
        growth: &GrowthConfig,
        adf: &AdfConfig,
        rng: &mut R,
    ) -> Result<()> {
        for _ in 0..growth.max_signatures {
            let contract = builder
                .random_contract(&self.signatures, adf, rng)
                .ok_or_else(|| GpError::Grow("catalog offers no types for an ADF".to_string()))?;
            let signature = builder.build(name, contract, ADF_ARG_PREFIX, &self.signatures, rng);
            if let Some(tree) =
                grower.grow_tree(&signature, growth.max_init_depth, growth.max_attempts, rng)
            {
                self.push(tree, signature);
                return Ok(());
            }
        }
        Err(GpError::Grow(format!(
            "no valid {} after {} signatures",
            name, growth.max_signatures
        )))
    }

    fn push(&mut self, tree: Tree, signature: Signature) {
        self.trees.push(tree);
        self.signatures.push(Arc::new(signature));
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn signatures(&self) -> &[Arc<Signature>] {
        &self.signatures
    }

    /// (tree, signature) pairs in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&Tree, &Signature)> {
        self.trees
            .iter()
            .zip(self.signatures.iter().map(|s| s.as_ref()))
    }

    pub fn adf_count(&self) -> usize {
        self.trees.len().saturating_sub(1)
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(Tree::len).sum()
    }

    pub fn rpb(&self) -> Option<&Tree> {
        self.trees.last()
    }

    pub fn fitness(&self) -> Option<&Fitness> {
        self.fitness.as_ref()
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn set_fitness(&mut self, fitness: Fitness) {
        self.fitness = Some(fitness);
    }

    pub fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }

    /// Replace a random subtree of a random tree with freshly grown material.
    ///
    /// The new subtree produces the same type and is at most
    /// `growth.max_mutation_depth` high; the mutated tree must still use all
    /// its formal arguments. On failure the individual is left untouched.
    pub fn mutate<R: Rng>(&mut self, growth: &GrowthConfig, rng: &mut R) -> Result<()> {
        let grower = TreeGrower::new(growth.terminal_probability);
        let branch = rng.gen_range(0..self.trees.len());
        let signature = Arc::clone(&self.signatures[branch]);
        let tree = self.trees[branch].clone();

        for _ in 0..growth.max_attempts {
            let index = rng.gen_range(0..tree.len());
            let data_type = tree.nodes()[index].output_type();
            let twig = match grower.grow(&signature, growth.max_mutation_depth, data_type, rng) {
                Ok(twig) => twig,
                Err(_) => continue,
            };

            let mut candidate = tree.clone();
            candidate.splice(tree.search_subtree(index), twig);
            if uses_all_arguments(&signature, &candidate) {
                self.trees[branch] = candidate;
                self.invalidate_fitness();
                return Ok(());
            }
        }

        debug!("Mutation of {} gave up after {} attempts", signature.name(), growth.max_attempts);
        Err(GpError::Grow(format!(
            "mutation of {} failed after {} attempts",
            signature.name(),
            growth.max_attempts
        )))
    }

    /// Graft a compatible subtree of `donor` in place of a random subtree here.
    ///
    /// Receiving positions are tried in random order. For each, the donor's
    /// nodes are searched (also in random order) for a subtree producing the
    /// same type whose every node the receiving signature accepts. The first
    /// match is spliced in. Fails with `GpError::NoMate` when no pair exists.
    pub fn mate<R: Rng>(&mut self, donor: &Individual, rng: &mut R) -> Result<()> {
        let mut positions = self.positions();
        positions.shuffle(rng);

        for (branch, index) in positions {
            let data_type = self.trees[branch].nodes()[index].output_type();
            if let Some(graft) = donor.find_slice(data_type, &self.signatures[branch], rng) {
                let pruned = self.trees[branch].search_subtree(index);
                self.trees[branch].splice(pruned, graft);
                self.invalidate_fitness();
                return Ok(());
            }
        }

        Err(GpError::NoMate(
            "exhausted every node pair without a compatible subtree".to_string(),
        ))
    }

    /// A subtree of this individual producing `data_type`, translated into
    /// `receiver`'s vocabulary
    fn find_slice<R: Rng>(
        &self,
        data_type: DataType,
        receiver: &Signature,
        rng: &mut R,
    ) -> Option<Vec<Node>> {
        let mut positions = self.positions();
        positions.shuffle(rng);

        positions.into_iter().find_map(|(branch, index)| {
            let tree = &self.trees[branch];
            if tree.nodes()[index].output_type() != data_type {
                return None;
            }
            tree.subtree(index)
                .iter()
                .map(|node| receiver.localize(node))
                .collect::<Option<Vec<Node>>>()
        })
    }

    fn positions(&self) -> Vec<(usize, usize)> {
        self.trees
            .iter()
            .enumerate()
            .flat_map(|(branch, tree)| (0..tree.len()).map(move |index| (branch, index)))
            .collect()
    }

    /// Build an executable program from the current trees.
    ///
    /// Always rebuilt from scratch so it reflects the latest mutation.
    pub fn compile(&self) -> Result<Program> {
        let functions = self
            .iter()
            .map(|(tree, signature)| {
                tree.validate(signature.output_type())?;
                Ok(CompiledFunction::new(
                    signature.name(),
                    signature.input_types().len(),
                    tree.nodes().to_vec(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Program::new(functions)
    }

    /// Ephemeral instances still referenced by a tree, by name
    pub fn ephemerals_used(&self) -> BTreeMap<String, Value> {
        self.trees
            .iter()
            .flat_map(|tree| tree.nodes())
            .filter_map(|node| match node {
                Node::Ephemeral(e) => Some((e.name.to_string(), e.value)),
                _ => None,
            })
            .collect()
    }
}

impl Individual {
    /// One `NAME: tree` line per function with exact ephemeral values.
    /// Equal strings mean structurally equal individuals.
    pub fn canonical_string(&self) -> String {
        let lines: Vec<String> = self
            .iter()
            .map(|(tree, signature)| format!("{}: {}", signature.name(), tree.canonical_string()))
            .collect();
        lines.join("\n")
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .iter()
            .map(|(tree, signature)| format!("{}: {}", signature.name(), tree))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

impl fmt::Debug for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Individual")
            .field("program", &self.to_string())
            .field("fitness", &self.fitness)
            .finish()
    }
}
