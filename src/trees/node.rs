use crate::data::dataset::{Dataset, Feature, Value};
use crate::error::{Result, TreeError};
use crate::metrics::confusion::ClassificationMetrics;
use nalgebra::DVector;
use std::fmt;

/// Index of a node inside the arena of its [`Tree`].
pub type NodeId = usize;

/// Decision tree node
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Tests a categorical feature. One child per value of its domain, indexed by value.
    Internal {
        feature: usize,
        children: Vec<NodeId>,
    },
    /// Predicts a class. `None` marks a leaf grown from a partition without records.
    Leaf { class: Option<usize> },
}

impl Node {
    pub fn feature(&self) -> Option<usize> {
        match self {
            Node::Internal { feature, .. } => Some(*feature),
            Node::Leaf { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A decision tree stored as an arena of nodes.
///
/// Children are referenced by index, so pruning can swap a child slot in place. Slots left
/// unreachable by pruning stay in the arena until [`Tree::compact`] is called.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    features: Vec<Feature>,
    class_index: usize,
}

impl ClassificationMetrics for Tree {}

impl Tree {
    /// Builds a tree from an arena. `features` is the schema the tree tests against.
    pub(crate) fn from_nodes(
        nodes: Vec<Node>,
        root: NodeId,
        features: Vec<Feature>,
        class_index: usize,
    ) -> Self {
        Self {
            nodes,
            root,
            features,
            class_index,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id] {
            Node::Internal { children, .. } => children.as_slice(),
            Node::Leaf { .. } => &[],
        }
    }

    /// Puts `child` into slot `slot` of `parent` and returns what was there before.
    pub(crate) fn replace_child(&mut self, parent: NodeId, slot: usize, child: NodeId) -> NodeId {
        match &mut self.nodes[parent] {
            Node::Internal { children, .. } => std::mem::replace(&mut children[slot], child),
            Node::Leaf { .. } => child,
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn class_feature(&self) -> &Feature {
        &self.features[self.class_index]
    }

    /// Label of a class value.
    pub fn class_label(&self, class: usize) -> Option<&str> {
        self.class_feature().value_name(class)
    }

    /// Walks the tree from the root and returns the class of the leaf reached.
    ///
    /// # Errors
    ///
    /// Fails when the record doesn't match the schema length, or when a tested feature is
    /// missing, holds a value the feature didn't have in training, or isn't categorical.
    pub fn classify(&self, record: &DVector<Value>) -> Result<Option<usize>> {
        if record.len() != self.features.len() {
            return Err(TreeError::RecordLength(record.len(), self.features.len()));
        }

        let mut id = self.root;
        loop {
            match &self.nodes[id] {
                Node::Leaf { class } => return Ok(*class),
                Node::Internal { feature, children } => {
                    let name = || self.features[*feature].name().to_string();
                    id = match record[*feature] {
                        Value::Category(value) if value < children.len() => children[value],
                        Value::Category(value) => {
                            return Err(TreeError::ValueOutOfDomain {
                                feature: name(),
                                value,
                                size: children.len(),
                            })
                        }
                        Value::Missing => return Err(TreeError::MissingQueryValue(name())),
                        Value::Numeric(_) => return Err(TreeError::UnexpectedValue(name())),
                    };
                }
            }
        }
    }

    /// Fraction of labeled records of `dataset` the tree classifies correctly.
    pub fn accuracy(&self, dataset: &Dataset) -> Result<f64> {
        let mut y_true = Vec::with_capacity(dataset.len());
        let mut y_pred = Vec::with_capacity(dataset.len());
        for (index, record) in dataset.records().enumerate() {
            if let Some(class) = dataset.class_value(index) {
                y_true.push(class);
                y_pred.push(self.classify(&record)?);
            }
        }
        ClassificationMetrics::accuracy(
            self,
            &DVector::from_vec(y_true),
            &DVector::from_vec(y_pred),
            dataset.num_classes(),
        )
    }

    fn reachable(&self) -> Vec<NodeId> {
        let mut visited = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            visited.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        visited
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.reachable().len()
    }

    pub fn leaf_count(&self) -> usize {
        self.reachable()
            .into_iter()
            .filter(|&id| self.nodes[id].is_leaf())
            .count()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.paths().iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Features tested along every root-to-leaf path, in the order they're tested.
    pub fn paths(&self) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        let mut stack = vec![(self.root, Vec::new())];
        while let Some((id, path)) = stack.pop() {
            match &self.nodes[id] {
                Node::Leaf { .. } => paths.push(path),
                Node::Internal { feature, children } => {
                    for &child in children.iter().rev() {
                        let mut path = path.clone();
                        path.push(*feature);
                        stack.push((child, path));
                    }
                }
            }
        }
        paths
    }

    /// Drops arena slots that are no longer reachable from the root.
    pub fn compact(&mut self) {
        let order = self.reachable();
        let mut remap = vec![usize::MAX; self.nodes.len()];
        for (new_id, &old_id) in order.iter().enumerate() {
            remap[old_id] = new_id;
        }
        let nodes = order
            .iter()
            .map(|&old_id| match &self.nodes[old_id] {
                Node::Internal { feature, children } => Node::Internal {
                    feature: *feature,
                    children: children.iter().map(|&child| remap[child]).collect(),
                },
                leaf => leaf.clone(),
            })
            .collect();
        self.nodes = nodes;
        self.root = 0;
    }

    /// Renders the tree as an indented outline.
    ///
    /// Every value of a tested feature gets a line `name = value`, prefixed by `|  ` once per
    /// level. Leaves append `: <class>` to the line above, or `: null` without training data.
    pub fn export(&self) -> String {
        let mut text = String::new();
        self.export_node(self.root, 0, &mut text);
        text
    }

    fn export_node(&self, id: NodeId, level: usize, text: &mut String) {
        match &self.nodes[id] {
            Node::Leaf { class } => {
                let label = class.and_then(|class| self.class_label(class));
                text.push_str(": ");
                text.push_str(label.unwrap_or("null"));
            }
            Node::Internal { feature, children } => {
                let feature = &self.features[*feature];
                for (value, &child) in children.iter().enumerate() {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&"|  ".repeat(level));
                    text.push_str(feature.name());
                    text.push_str(" = ");
                    text.push_str(feature.value_name(value).unwrap_or("?"));
                    self.export_node(child, level + 1, text);
                }
            }
        }
    }
}

/// The outline of [`Tree::export`] with a line break ahead of every feature line, so an
/// internal root starts with a newline and a leaf root doesn't.
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.nodes[self.root].is_leaf() {
            writeln!(f)?;
        }
        write!(f, "{}", self.export())
    }
}
