use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use federa_core::serialize::to_bytes;
use federa_core::{hash_blake3, CoreError, Hash, NodeId};
use serde::{Deserialize, Serialize};

/// A node's trust configuration: `threshold` of the direct entries
/// (validators and inner sets) must be satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuorumSet {
    pub threshold: u32,
    pub validators: Vec<NodeId>,
    pub inner_sets: Vec<QuorumSet>,
}

impl QuorumSet {
    pub fn new(threshold: u32, validators: Vec<NodeId>, inner_sets: Vec<QuorumSet>) -> Self {
        QuorumSet {
            threshold,
            validators,
            inner_sets,
        }
    }

    /// Number of direct entries at this level
    pub fn total_entries(&self) -> usize {
        self.validators.len() + self.inner_sets.len()
    }

    /// True when there are no entries at this level
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty() && self.inner_sets.is_empty()
    }

    /// Content hash over the canonical bincode encoding
    pub fn hash(&self) -> Result<Hash, CoreError> {
        Ok(hash_blake3(&to_bytes(self)?))
    }

    /// Every distinct node named anywhere in the tree
    pub fn all_nodes(&self) -> BTreeSet<NodeId> {
        let mut nodes = BTreeSet::new();
        for_all_nodes(self, |n| {
            nodes.insert(*n);
        });
        nodes
    }
}

/// `{ t: 1, [node_id] }`, the trust configuration of a node nobody told us about
pub fn build_singleton_quorum_set(node_id: NodeId) -> QuorumSet {
    QuorumSet::new(1, vec![node_id], Vec::new())
}

/// Runs `f` once for every distinct node in `qset`, validators of a level
/// before the nodes of its inner sets.
pub fn for_all_nodes<F>(qset: &QuorumSet, mut f: F)
where
    F: FnMut(&NodeId),
{
    let mut done = BTreeSet::new();
    for_all_nodes_inner(qset, &mut done, &mut f);
}

fn for_all_nodes_inner<F>(qset: &QuorumSet, done: &mut BTreeSet<NodeId>, f: &mut F)
where
    F: FnMut(&NodeId),
{
    for node in &qset.validators {
        if done.insert(*node) {
            f(node);
        }
    }
    for inner in &qset.inner_sets {
        for_all_nodes_inner(inner, done, f);
    }
}

/// Membership view over a collection of nodes.
pub trait NodeSet {
    fn contains_node(&self, node: &NodeId) -> bool;

    /// Number of entries, duplicates included
    fn node_count(&self) -> usize;
}

impl NodeSet for [NodeId] {
    fn contains_node(&self, node: &NodeId) -> bool {
        self.contains(node)
    }

    fn node_count(&self) -> usize {
        self.len()
    }
}

impl NodeSet for Vec<NodeId> {
    fn contains_node(&self, node: &NodeId) -> bool {
        self.as_slice().contains(node)
    }

    fn node_count(&self) -> usize {
        self.len()
    }
}

impl NodeSet for BTreeSet<NodeId> {
    fn contains_node(&self, node: &NodeId) -> bool {
        self.contains(node)
    }

    fn node_count(&self) -> usize {
        self.len()
    }
}

impl<S: BuildHasher> NodeSet for HashSet<NodeId, S> {
    fn contains_node(&self, node: &NodeId) -> bool {
        self.contains(node)
    }

    fn node_count(&self) -> usize {
        self.len()
    }
}
