use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use federa_core::NodeId;
use tracing::debug;

use crate::predicates::{is_quorum_slice, quorum_slice_inner, relevant_nodes};
use crate::quorum_set::QuorumSet;

/// Outcome of the fixed-point search behind [`is_quorum`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitivePool {
    /// Relevant nodes whose own quorum set is satisfied by the pool
    pub nodes: Vec<NodeId>,
    /// Filtering passes run. The last one either removed nothing or emptied
    /// the pool; an empty starting pool needs none.
    pub rounds: usize,
}

/// Shrinks the relevant senders until every remaining node's own quorum set
/// is a slice of the remaining pool.
///
/// A sender whose quorum set `qset_of` cannot resolve is removed.
pub fn transitive_pool<T, Q, P>(
    statements: &BTreeMap<NodeId, T>,
    qset_of: Q,
    relevance: P,
) -> TransitivePool
where
    Q: Fn(&T) -> Option<Arc<QuorumSet>>,
    P: Fn(&T) -> bool,
{
    let mut nodes = relevant_nodes(statements, relevance);
    let mut rounds = 0;

    // every round but the last removes a node, so rounds <= relevant senders
    while !nodes.is_empty() {
        rounds += 1;
        let count = nodes.len();
        let kept: Vec<NodeId> = nodes
            .iter()
            .filter(|node| {
                statements
                    .get(*node)
                    .and_then(&qset_of)
                    .map(|qset| quorum_slice_inner(&qset, &nodes))
                    .unwrap_or(false)
            })
            .copied()
            .collect();
        nodes = kept;
        if nodes.len() == count {
            break;
        }
    }

    debug!(
        "Transitive pool of {} nodes after {} rounds",
        nodes.len(),
        rounds
    );

    TransitivePool { nodes, rounds }
}

/// Do the relevant statements come from a quorum that also satisfies `qset`?
pub fn is_quorum<T, Q, P>(
    qset: &QuorumSet,
    statements: &BTreeMap<NodeId, T>,
    qset_of: Q,
    relevance: P,
) -> bool
where
    Q: Fn(&T) -> Option<Arc<QuorumSet>>,
    P: Fn(&T) -> bool,
{
    let pool = transitive_pool(statements, qset_of, relevance);
    is_quorum_slice(qset, &pool.nodes)
}

/// Smallest subset of `nodes` found that, together with the nodes of `qset`
/// missing from `nodes`, is v-blocking for `qset`.
///
/// Empty means `qset` is already blocked by nodes outside of `nodes`.
/// Inner-set witnesses are used smallest first.
pub fn find_closest_v_blocking(qset: &QuorumSet, nodes: &BTreeSet<NodeId>) -> Vec<NodeId> {
    let mut left_till_block =
        (1 + qset.total_entries()).saturating_sub(qset.threshold as usize);

    let mut res = Vec::new();

    for validator in &qset.validators {
        if nodes.contains(validator) {
            res.push(*validator);
        } else {
            left_till_block = left_till_block.saturating_sub(1);
            if left_till_block == 0 {
                return Vec::new();
            }
        }
    }

    let mut witnesses = Vec::new();
    for inner in &qset.inner_sets {
        let witness = find_closest_v_blocking(inner, nodes);
        if witness.is_empty() {
            left_till_block = left_till_block.saturating_sub(1);
            if left_till_block == 0 {
                return Vec::new();
            }
        } else {
            witnesses.push(witness);
        }
    }

    res.truncate(left_till_block);
    left_till_block -= res.len();

    witnesses.sort_by_key(Vec::len);
    for witness in witnesses {
        if left_till_block == 0 {
            break;
        }
        res.extend(witness);
        left_till_block -= 1;
    }

    res
}

/// [`find_closest_v_blocking`] over the senders of the statements that pass
/// `relevance`
pub fn find_closest_v_blocking_with<T, P>(
    qset: &QuorumSet,
    statements: &BTreeMap<NodeId, T>,
    relevance: P,
) -> Vec<NodeId>
where
    P: Fn(&T) -> bool,
{
    let nodes: BTreeSet<NodeId> = relevant_nodes(statements, relevance).into_iter().collect();
    find_closest_v_blocking(qset, &nodes)
}
