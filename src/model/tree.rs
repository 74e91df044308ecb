//! Arena-backed binary decision tree.
//!
//! Nodes live in a flat `Vec` and reference their children by index. A tree
//! is validated once when built and never mutated afterwards, so it can be
//! shared freely between classifiers.

use super::{plain_number, Prediction};
use crate::error::{Error, Result};
use crate::features::{format_time, Feature, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Values below `threshold` go left, the rest go right.
    Split {
        feature: Feature,
        threshold: f64,
        left: NodeId,
        right: NodeId,
        #[serde(default)]
        details: Vec<String>,
    },
    Leaf {
        prediction: Prediction,
        confidence: f64,
        #[serde(default)]
        details: Vec<String>,
    },
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn details(&self) -> &[String] {
        match self {
            TreeNode::Split { details, .. } | TreeNode::Leaf { details, .. } => details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeDef", into = "TreeDef")]
pub struct DecisionTree {
    root: NodeId,
    nodes: Vec<TreeNode>,
}

#[derive(Serialize, Deserialize)]
struct TreeDef {
    root: NodeId,
    nodes: Vec<TreeNode>,
}

impl TryFrom<TreeDef> for DecisionTree {
    type Error = Error;

    fn try_from(def: TreeDef) -> Result<Self> {
        DecisionTree::from_nodes(def.root, def.nodes)
    }
}

impl From<DecisionTree> for TreeDef {
    fn from(tree: DecisionTree) -> Self {
        TreeDef {
            root: tree.root,
            nodes: tree.nodes,
        }
    }
}

/// Outcome of walking the tree for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    pub leaf: NodeId,
    /// Visited nodes, root first, leaf last.
    pub path: Vec<NodeId>,
    pub prediction: Prediction,
    pub base_confidence: f64,
    pub details: Vec<String>,
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidTree(msg.into())
}

impl DecisionTree {
    /// Validate an arena: the root is a split, children and features are in
    /// range, every other node has exactly one parent and is reachable from
    /// the root, and leaf confidences lie in (0, 1].
    pub fn from_nodes(root: NodeId, nodes: Vec<TreeNode>) -> Result<Self> {
        let n = nodes.len();
        match nodes.get(root) {
            None => return Err(invalid(format!("root {} not in {} nodes", root, n))),
            Some(node) if node.is_leaf() => return Err(invalid("root must be a split")),
            Some(_) => {}
        }

        let mut parents = vec![0u32; n];
        for (id, node) in nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if !feature.in_range() {
                        return Err(invalid(format!(
                            "node {} tests {}, outside V1..V28",
                            id, feature
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(invalid(format!("node {} has a non-finite threshold", id)));
                    }
                    for &child in [left, right] {
                        if child >= n {
                            return Err(invalid(format!(
                                "node {} points at missing node {}",
                                id, child
                            )));
                        }
                        if child == root {
                            return Err(invalid(format!("node {} points back at the root", id)));
                        }
                        parents[child] += 1;
                        if parents[child] > 1 {
                            return Err(invalid(format!(
                                "node {} has more than one parent",
                                child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { confidence, .. } => {
                    if !(*confidence > 0.0 && *confidence <= 1.0) {
                        return Err(invalid(format!(
                            "leaf {} confidence {} outside (0, 1]",
                            id, confidence
                        )));
                    }
                }
            }
        }

        let mut seen = vec![false; n];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            seen[id] = true;
            if let TreeNode::Split { left, right, .. } = &nodes[id] {
                stack.push(*left);
                stack.push(*right);
            }
        }
        if let Some(orphan) = seen.iter().position(|s| !s) {
            return Err(invalid(format!("node {} is unreachable from the root", orphan)));
        }

        Ok(Self { root, nodes })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Longest root-to-leaf path, counted in splits.
    pub fn depth(&self) -> usize {
        self.node_depth(self.root)
    }

    fn node_depth(&self, id: NodeId) -> usize {
        match &self.nodes[id] {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => {
                1 + self.node_depth(*left).max(self.node_depth(*right))
            }
        }
    }

    /// Walk from the root to a leaf, collecting each node's narration plus a
    /// decision-point line per split.
    pub fn traverse(&self, record: &TransactionRecord) -> Traversal {
        let mut path = Vec::new();
        let mut details = Vec::new();
        let mut id = self.root;
        loop {
            path.push(id);
            match &self.nodes[id] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    details: own,
                } => {
                    let value = record.value(*feature);
                    details.extend(own.iter().cloned());
                    details.push(decision_point(*feature, value, *threshold));
                    id = if value < *threshold { *left } else { *right };
                }
                TreeNode::Leaf {
                    prediction,
                    confidence,
                    details: own,
                } => {
                    details.extend(own.iter().cloned());
                    return Traversal {
                        leaf: id,
                        path,
                        prediction: *prediction,
                        base_confidence: *confidence,
                        details,
                    };
                }
            }
        }
    }

    /// Node ids on the record's root-to-leaf path.
    pub fn active_path(&self, record: &TransactionRecord) -> Vec<NodeId> {
        self.traverse(record).path
    }
}

fn decision_point(feature: Feature, value: f64, threshold: f64) -> String {
    let shown = match feature {
        Feature::Time => format!("{} ({})", plain_number(value), format_time(value as u32)),
        // -0.0 prints as 0.00
        _ => format!("{:.2}", value + 0.0),
    };
    let op = if value < threshold { "<" } else { "≥" };
    format!(
        "Decision point: {} = {} {} {}",
        feature.label(),
        shown,
        op,
        plain_number(threshold)
    )
}

/// Bottom-up arena construction: children are added before their parent.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<TreeNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(&mut self, prediction: Prediction, confidence: f64, details: &[&str]) -> NodeId {
        self.push(TreeNode::Leaf {
            prediction,
            confidence,
            details: to_strings(details),
        })
    }

    pub fn split(
        &mut self,
        feature: Feature,
        threshold: f64,
        details: &[&str],
        left: NodeId,
        right: NodeId,
    ) -> NodeId {
        self.push(TreeNode::Split {
            feature,
            threshold,
            left,
            right,
            details: to_strings(details),
        })
    }

    pub fn build(self, root: NodeId) -> Result<DecisionTree> {
        DecisionTree::from_nodes(root, self.nodes)
    }

    fn push(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

fn to_strings(details: &[&str]) -> Vec<String> {
    details.iter().map(|d| d.to_string()).collect()
}

static FRAUD_TREE: OnceLock<Arc<DecisionTree>> = OnceLock::new();

/// The built-in fraud tree: time first, then amount, then one of V12, V14
/// or V17.
pub fn fraud_tree() -> Arc<DecisionTree> {
    FRAUD_TREE
        .get_or_init(|| {
            Arc::new(build_fraud_tree().expect("built-in fraud tree is well formed"))
        })
        .clone()
}

fn build_fraud_tree() -> Result<DecisionTree> {
    use Prediction::{Fraud, NotFraud};

    let mut b = TreeBuilder::new();

    // Before 3 AM, small amount
    let night_small_neg_v14 = b.leaf(
        Fraud,
        0.92,
        &["Small transaction during suspicious hours with negative V14 value"],
    );
    let night_small_low_v12 = b.leaf(
        Fraud,
        0.85,
        &["Small transaction during suspicious hours with strongly negative V12 value"],
    );
    let night_small_normal_v12 = b.leaf(
        NotFraud,
        0.75,
        &["Small transaction during suspicious hours but normal V12 value"],
    );
    let night_small_v12 = b.split(
        Feature::V(12),
        -2.0,
        &[
            "Small transaction during suspicious hours with positive V14 value",
            "Checking V12 value",
        ],
        night_small_low_v12,
        night_small_normal_v12,
    );
    let night_small = b.split(
        Feature::V(14),
        0.0,
        &[
            "Small transaction amount during suspicious hours",
            "Checking transaction pattern (V14)",
        ],
        night_small_neg_v14,
        night_small_v12,
    );

    // Before 3 AM, normal or large amount
    let night_normal = b.leaf(
        NotFraud,
        0.82,
        &["Normal transaction amount during suspicious hours"],
    );
    let night_large_normal_v17 = b.leaf(
        NotFraud,
        0.68,
        &["Large transaction during suspicious hours but normal V17 value"],
    );
    let night_large_high_v17 = b.leaf(
        Fraud,
        0.88,
        &["Large transaction during suspicious hours with abnormal V17 value"],
    );
    let night_large = b.split(
        Feature::V(17),
        1.5,
        &[
            "Large transaction during suspicious hours",
            "Checking transaction pattern (V17)",
        ],
        night_large_normal_v17,
        night_large_high_v17,
    );
    let night_not_small = b.split(
        Feature::Amount,
        10000.0,
        &[
            "Transaction during suspicious hours",
            "Evaluating if amount is very large",
        ],
        night_normal,
        night_large,
    );
    let night = b.split(
        Feature::Amount,
        5.0,
        &[
            "Transaction during suspicious hours (before 3 AM)",
            "Evaluating transaction amount",
        ],
        night_small,
        night_not_small,
    );

    // After 3 AM, very small amount
    let day_small_neg_v17 = b.leaf(
        Fraud,
        0.78,
        &["Very small transaction with negative V17 value"],
    );
    let day_small_pos_v17 = b.leaf(
        NotFraud,
        0.65,
        &["Very small transaction with positive V17 value"],
    );
    let day_small = b.split(
        Feature::V(17),
        0.0,
        &[
            "Very small transaction during normal hours",
            "Checking transaction pattern (V17)",
        ],
        day_small_neg_v17,
        day_small_pos_v17,
    );

    // After 3 AM, normal or very large amount
    let day_normal = b.leaf(
        NotFraud,
        0.95,
        &["Normal transaction amount during regular hours"],
    );
    let day_large_normal_v12 = b.leaf(
        NotFraud,
        0.72,
        &["Large transaction with normal V12 value"],
    );
    let day_large_high_v12 = b.leaf(
        Fraud,
        0.82,
        &["Large transaction with abnormal V12 value"],
    );
    let day_large = b.split(
        Feature::V(12),
        3.0,
        &[
            "Very large transaction amount",
            "Checking transaction pattern (V12)",
        ],
        day_large_normal_v12,
        day_large_high_v12,
    );
    let day_not_small = b.split(
        Feature::Amount,
        15000.0,
        &[
            "Normal transaction time",
            "Evaluating if amount is extremely large",
        ],
        day_normal,
        day_large,
    );
    let day = b.split(
        Feature::Amount,
        2.0,
        &[
            "Transaction during normal hours (after 3 AM)",
            "Evaluating if amount is very small",
        ],
        day_small,
        day_not_small,
    );

    let root = b.split(
        Feature::Time,
        10800.0,
        &["Evaluating transaction time"],
        night,
        day,
    );
    b.build(root)
}
