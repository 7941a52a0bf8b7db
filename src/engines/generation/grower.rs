use super::node::Node;
use super::signature::Signature;
use super::tree::Tree;
use crate::types::DataType;
use rand::seq::SliceRandom;
use rand::Rng;

/// No node of the required type could be placed at some position.
///
/// This is a local signal; callers retry with fresh random draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadBranch;

/// Grows type-valid trees from a signature with the "grow" method: every
/// position holds either a terminal or a primitive, up to a height limit.
#[derive(Debug, Clone, Copy)]
pub struct TreeGrower {
    terminal_probability: f64,
}

impl TreeGrower {
    pub fn new(terminal_probability: f64) -> Self {
        Self {
            terminal_probability,
        }
    }

    /// Grow one expression producing `data_type`, at most `max_depth` levels high
    pub fn grow<R: Rng>(
        &self,
        signature: &Signature,
        max_depth: usize,
        data_type: DataType,
        rng: &mut R,
    ) -> Result<Vec<Node>, DeadBranch> {
        let mut expr = Vec::new();
        self.build_expression(signature, max_depth, data_type, rng, &mut expr)?;
        Ok(expr)
    }

    /// Grow a complete body for `signature`, retrying up to `max_attempts`
    /// times until the tree is not dead and references every formal argument.
    pub fn grow_tree<R: Rng>(
        &self,
        signature: &Signature,
        max_depth: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> Option<Tree> {
        for _ in 0..max_attempts {
            if let Ok(nodes) = self.grow(signature, max_depth, signature.output_type(), rng) {
                let tree = Tree::new(nodes);
                if uses_all_arguments(signature, &tree) {
                    return Some(tree);
                }
            }
        }
        None
    }

    fn build_expression<R: Rng>(
        &self,
        signature: &Signature,
        max_depth: usize,
        data_type: DataType,
        rng: &mut R,
        expr: &mut Vec<Node>,
    ) -> Result<(), DeadBranch> {
        let primitives = signature.primitives_of(data_type);

        if max_depth <= 1 || primitives.is_empty() {
            return self.build_terminal(signature, data_type, rng, expr);
        }

        if rng.gen::<f64>() < self.terminal_probability {
            return self.build_terminal(signature, data_type, rng, expr);
        }

        let mut order: Vec<usize> = (0..primitives.len()).collect();
        order.shuffle(rng);

        for idx in order {
            let primitive = &primitives[idx];
            let mark = expr.len();
            expr.push(primitive.clone());

            let complete = primitive
                .input_types()
                .iter()
                .all(|&arg_type| {
                    self.build_expression(signature, max_depth - 1, arg_type, rng, expr)
                        .is_ok()
                });
            if complete {
                return Ok(());
            }
            expr.truncate(mark);
        }

        // every primitive died; the terminal path is still untried
        self.build_terminal(signature, data_type, rng, expr)
    }

    fn build_terminal<R: Rng>(
        &self,
        signature: &Signature,
        data_type: DataType,
        rng: &mut R,
        expr: &mut Vec<Node>,
    ) -> Result<(), DeadBranch> {
        let terminal = signature
            .terminals_of(data_type)
            .choose(rng)
            .ok_or(DeadBranch)?;
        expr.push(terminal.clone());
        Ok(())
    }
}

/// True if every formal argument of `signature` appears in `tree`
pub fn uses_all_arguments(signature: &Signature, tree: &Tree) -> bool {
    signature
        .arguments()
        .iter()
        .all(|arg| tree.uses_argument(arg.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::signature::{Contract, SignatureBuilder};
    use crate::functions::PrimitiveCatalog;
    use crate::types::Value;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn signature(catalog: &PrimitiveCatalog, contract: Contract) -> Signature {
        let mut rng = StdRng::seed_from_u64(0);
        SignatureBuilder::new(catalog).build("MAIN", contract, "IN", &[], &mut rng)
    }

    #[test]
    fn test_grown_trees_are_sound_and_bounded() {
        let mut catalog = PrimitiveCatalog::new();
        catalog
            .with_arithmetic_primitives()
            .unwrap()
            .add_primitive("to_float", vec![DataType::INT], DataType::FLOAT, |args| {
                Value::Float(args[0].as_f64())
            })
            .unwrap();
        let sig = signature(
            &catalog,
            Contract::new(vec![DataType::FLOAT, DataType::INT], DataType::FLOAT),
        );
        let grower = TreeGrower::new(0.3);
        let mut rng = StdRng::seed_from_u64(11);

        for depth in 1..=6 {
            for _ in 0..100 {
                let nodes = grower.grow(&sig, depth, DataType::FLOAT, &mut rng).unwrap();
                let tree = Tree::new(nodes);
                assert!(tree.validate(DataType::FLOAT).is_ok(), "unsound: {}", tree);
                assert!(tree.height() <= depth, "{} exceeds {}", tree, depth);
            }
        }
    }

    #[test]
    fn test_dead_branch_without_terminal() {
        let mut catalog = PrimitiveCatalog::new();
        catalog.with_arithmetic_primitives().unwrap();
        // no float terminal and no arguments
        let sig = signature(&catalog, Contract::new(vec![], DataType::FLOAT));
        let grower = TreeGrower::new(0.3);
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(grower.grow(&sig, 1, DataType::FLOAT, &mut rng).err(), Some(DeadBranch));
        assert_eq!(grower.grow(&sig, 4, DataType::FLOAT, &mut rng).err(), Some(DeadBranch));
        assert!(grower.grow_tree(&sig, 4, 20, &mut rng).is_none());
    }

    #[test]
    fn test_exhausted_primitive_falls_back_to_other_candidates() {
        let mut catalog = PrimitiveCatalog::new();
        catalog
            // can never complete: nothing produces INT
            .add_primitive("from_int", vec![DataType::INT], DataType::FLOAT, |args| {
                Value::Float(args[0].as_f64())
            })
            .unwrap()
            .register_primitive(std::sync::Arc::new(crate::functions::primitives::Square))
            .unwrap();
        let sig = signature(&catalog, Contract::new(vec![DataType::FLOAT], DataType::FLOAT));
        let grower = TreeGrower::new(0.0);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..50 {
            let tree = Tree::new(grower.grow(&sig, 4, DataType::FLOAT, &mut rng).unwrap());
            assert!(!tree.to_string().contains("from_int"));
            assert_eq!(tree.to_string(), "square(square(square(IN0)))");
        }
    }

    #[test]
    fn test_grow_tree_uses_every_argument() {
        let mut catalog = PrimitiveCatalog::new();
        catalog.with_boolean_primitives().unwrap();
        let sig = signature(&catalog, Contract::new(vec![DataType::BOOL; 4], DataType::BOOL));
        let grower = TreeGrower::new(0.3);
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..25 {
            let tree = grower.grow_tree(&sig, 5, 500, &mut rng).expect("tree grows");
            for name in ["IN0", "IN1", "IN2", "IN3"] {
                assert!(tree.uses_argument(name));
            }
        }
    }

    #[test]
    fn test_terminal_draw_without_terminals_is_dead() {
        let mut catalog = PrimitiveCatalog::new();
        catalog
            .add_primitive("lt", vec![DataType::FLOAT, DataType::FLOAT], DataType::BOOL, |args| {
                Value::Bool(args[0].as_f64() < args[1].as_f64())
            })
            .unwrap();
        // BOOL has a primitive but no terminal
        let sig = signature(&catalog, Contract::new(vec![DataType::FLOAT], DataType::BOOL));
        let mut rng = StdRng::seed_from_u64(17);

        let always_terminal = TreeGrower::new(1.0);
        assert_eq!(
            always_terminal.grow(&sig, 3, DataType::BOOL, &mut rng).err(),
            Some(DeadBranch)
        );

        let never_terminal = TreeGrower::new(0.0);
        let tree = Tree::new(never_terminal.grow(&sig, 3, DataType::BOOL, &mut rng).unwrap());
        assert_eq!(tree.to_string(), "lt(IN0, IN0)");
    }
}
