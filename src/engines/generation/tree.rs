use super::node::Node;
use crate::error::{GpError, Result};
use crate::types::DataType;
use std::fmt;
use std::ops::Range;

/// An expression tree stored as its pre-order flattening.
///
/// Every node is immediately followed by the complete encodings of its
/// children, in input order, so any subtree is a contiguous slice.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// Slice bounds of the subtree rooted at `begin`.
    ///
    /// Walks forward accumulating the arity of every visited node until all
    /// children opened by the start node have been consumed.
    pub fn search_subtree(&self, begin: usize) -> Range<usize> {
        let mut end = begin + 1;
        let mut total = self.nodes[begin].arity();
        while total > 0 && end < self.nodes.len() {
            total = total - 1 + self.nodes[end].arity();
            end += 1;
        }
        begin..end
    }

    pub fn subtree(&self, begin: usize) -> &[Node] {
        &self.nodes[self.search_subtree(begin)]
    }

    /// Replace the slice `range` with `replacement`
    pub fn splice(&mut self, range: Range<usize>, replacement: Vec<Node>) {
        self.nodes.splice(range, replacement);
    }

    /// Number of node levels; a lone terminal has height 1
    pub fn height(&self) -> usize {
        let mut stack = vec![1usize];
        let mut height = 0;
        for node in &self.nodes {
            let depth = match stack.pop() {
                Some(depth) => depth,
                None => break,
            };
            height = height.max(depth);
            stack.extend(std::iter::repeat(depth + 1).take(node.arity()));
        }
        height
    }

    pub fn uses_argument(&self, name: &str) -> bool {
        self.nodes
            .iter()
            .any(|node| matches!(node, Node::Argument(a) if a.name.as_ref() == name))
    }

    /// Check that every child slice produces exactly the input types its
    /// parent declares and the root produces `expected`.
    pub fn validate(&self, expected: DataType) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(GpError::InvalidTree("empty tree".to_string()));
        }

        let mut pending = vec![expected];
        for (idx, node) in self.nodes.iter().enumerate() {
            let wanted = pending.pop().ok_or_else(|| {
                GpError::InvalidTree(format!("trailing node '{}' at position {}", node.name(), idx))
            })?;
            if node.output_type() != wanted {
                return Err(GpError::TypeMismatch {
                    expected: wanted.to_string(),
                    actual: format!("{} ('{}' at position {})", node.output_type(), node.name(), idx),
                });
            }
            pending.extend(node.input_types().iter().rev().copied());
        }

        if !pending.is_empty() {
            return Err(GpError::InvalidTree(format!(
                "{} argument(s) missing at the end of the encoding",
                pending.len()
            )));
        }
        Ok(())
    }
}

impl Tree {
    /// Prefix rendering that keeps ephemeral values exact, for telling
    /// trees apart
    pub fn canonical_string(&self) -> String {
        self.render(Node::key)
    }

    fn render(&self, label: fn(&Node) -> String) -> String {
        let mut stack: Vec<(&Node, Vec<String>)> = Vec::new();
        let mut rendered = String::new();

        for node in &self.nodes {
            stack.push((node, Vec::with_capacity(node.arity())));
            while stack
                .last()
                .map_or(false, |(node, args)| args.len() == node.arity())
            {
                let (node, args) = match stack.pop() {
                    Some(entry) => entry,
                    None => break,
                };
                let text = if args.is_empty() {
                    label(node)
                } else {
                    format!("{}({})", label(node), args.join(", "))
                };
                match stack.last_mut() {
                    Some((_, parent_args)) => parent_args.push(text),
                    None => rendered = text,
                }
            }
        }

        rendered
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Node::label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::node::ArgumentNode;
    use crate::functions::primitives::{Add, Nor, Square};
    use crate::functions::Terminal;
    use std::sync::Arc;

    fn arg(name: &str, index: usize, data_type: DataType) -> Node {
        Node::Argument(Arc::new(ArgumentNode {
            name: Arc::from(name),
            index,
            data_type,
        }))
    }

    fn one() -> Node {
        Node::Terminal(Arc::new(Terminal {
            name: Arc::from("one"),
            value: crate::types::Value::Float(1.0),
            data_type: DataType::FLOAT,
        }))
    }

    // add(square(IN0), add(one, IN1))
    fn sample() -> Tree {
        Tree::new(vec![
            Node::Primitive(Arc::new(Add)),
            Node::Primitive(Arc::new(Square)),
            arg("IN0", 0, DataType::FLOAT),
            Node::Primitive(Arc::new(Add)),
            one(),
            arg("IN1", 1, DataType::FLOAT),
        ])
    }

    #[test]
    fn test_search_subtree() {
        let tree = sample();
        assert_eq!(tree.search_subtree(0), 0..6);
        assert_eq!(tree.search_subtree(1), 1..3);
        assert_eq!(tree.search_subtree(2), 2..3);
        assert_eq!(tree.search_subtree(3), 3..6);
        assert_eq!(tree.search_subtree(5), 5..6);
    }

    #[test]
    fn test_height_and_display() {
        let tree = sample();
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.to_string(), "add(square(IN0), add(one, IN1))");
        assert_eq!(Tree::new(vec![one()]).height(), 1);
    }

    #[test]
    fn test_splice_keeps_encoding_valid() {
        let mut tree = sample();
        let range = tree.search_subtree(3);
        tree.splice(range, vec![arg("IN1", 1, DataType::FLOAT)]);
        assert_eq!(tree.to_string(), "add(square(IN0), IN1)");
        assert!(tree.validate(DataType::FLOAT).is_ok());
    }

    #[test]
    fn test_validate_rejects_type_errors() {
        let tree = Tree::new(vec![
            Node::Primitive(Arc::new(Nor)),
            arg("IN0", 0, DataType::BOOL),
            one(),
        ]);
        assert!(matches!(
            tree.validate(DataType::BOOL),
            Err(GpError::TypeMismatch { .. })
        ));
        assert!(matches!(
            sample().validate(DataType::BOOL),
            Err(GpError::TypeMismatch { .. })
        ));

        let truncated = Tree::new(sample().nodes()[..4].to_vec());
        assert!(matches!(
            truncated.validate(DataType::FLOAT),
            Err(GpError::InvalidTree(_))
        ));
    }

    #[test]
    fn test_uses_argument() {
        let tree = sample();
        assert!(tree.uses_argument("IN0"));
        assert!(tree.uses_argument("IN1"));
        assert!(!tree.uses_argument("IN2"));
    }
}
