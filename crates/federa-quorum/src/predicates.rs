use std::collections::BTreeMap;

use federa_core::NodeId;
use tracing::trace;

use crate::quorum_set::{NodeSet, QuorumSet};

/// Does `nodes` satisfy `qset`?
///
/// Stops as soon as enough entries are satisfied. A set with threshold 0
/// is never satisfied.
pub fn is_quorum_slice<S>(qset: &QuorumSet, nodes: &S) -> bool
where
    S: NodeSet + ?Sized,
{
    trace!("is_quorum_slice node_set.size: {}", nodes.node_count());
    quorum_slice_inner(qset, nodes)
}

pub(crate) fn quorum_slice_inner<S>(qset: &QuorumSet, nodes: &S) -> bool
where
    S: NodeSet + ?Sized,
{
    if qset.threshold == 0 {
        return false;
    }

    let mut threshold_left = qset.threshold;
    for validator in &qset.validators {
        if nodes.contains_node(validator) {
            threshold_left -= 1;
            if threshold_left == 0 {
                return true;
            }
        }
    }

    for inner in &qset.inner_sets {
        if quorum_slice_inner(inner, nodes) {
            threshold_left -= 1;
            if threshold_left == 0 {
                return true;
            }
        }
    }

    false
}

/// Does `nodes` intersect every slice of `qset`?
///
/// A set with threshold 0 is trivially satisfiable, so nothing blocks it.
pub fn is_v_blocking<S>(qset: &QuorumSet, nodes: &S) -> bool
where
    S: NodeSet + ?Sized,
{
    trace!("is_v_blocking node_set.size: {}", nodes.node_count());
    v_blocking_inner(qset, nodes)
}

fn v_blocking_inner<S>(qset: &QuorumSet, nodes: &S) -> bool
where
    S: NodeSet + ?Sized,
{
    if qset.threshold == 0 {
        return false;
    }

    // entries that must fail before the threshold is out of reach
    let mut left_till_block = (1 + qset.total_entries() as i64) - i64::from(qset.threshold);

    for validator in &qset.validators {
        if nodes.contains_node(validator) {
            left_till_block -= 1;
            if left_till_block <= 0 {
                return true;
            }
        }
    }

    for inner in &qset.inner_sets {
        if v_blocking_inner(inner, nodes) {
            left_till_block -= 1;
            if left_till_block <= 0 {
                return true;
            }
        }
    }

    false
}

/// Nodes whose statement passes `relevance`, in map order
pub fn relevant_nodes<T, P>(statements: &BTreeMap<NodeId, T>, relevance: P) -> Vec<NodeId>
where
    P: Fn(&T) -> bool,
{
    statements
        .iter()
        .filter(|(_, statement)| relevance(statement))
        .map(|(node, _)| *node)
        .collect()
}

/// [`is_v_blocking`] over the senders of the statements that pass `relevance`
pub fn is_v_blocking_with<T, P>(
    qset: &QuorumSet,
    statements: &BTreeMap<NodeId, T>,
    relevance: P,
) -> bool
where
    P: Fn(&T) -> bool,
{
    let nodes = relevant_nodes(statements, relevance);
    is_v_blocking(qset, &nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum_set::build_singleton_quorum_set;
    use federa_core::PublicKey;
    use std::collections::BTreeSet;

    fn node(i: u8) -> NodeId {
        PublicKey([i; 32])
    }

    fn nodes(ids: &[u8]) -> Vec<NodeId> {
        ids.iter().copied().map(node).collect()
    }

    fn two_of_three() -> QuorumSet {
        QuorumSet::new(2, nodes(&[1, 2, 3]), vec![])
    }

    #[test]
    fn test_slice_threshold_exact() {
        let qset = two_of_three();
        assert!(is_quorum_slice(&qset, &nodes(&[1, 2])));
        assert!(!is_quorum_slice(&qset, &nodes(&[1])));
        assert!(!is_quorum_slice(&qset, &nodes(&[])));
    }

    #[test]
    fn test_slice_ignores_duplicates_and_strangers() {
        let qset = two_of_three();
        assert!(!is_quorum_slice(&qset, &nodes(&[1, 1, 1, 9])));
        assert!(is_quorum_slice(&qset, &nodes(&[9, 3, 1])));
    }

    #[test]
    fn test_slice_with_inner_sets() {
        // { t: 2, A, { t: 1, B, C }, { t: 2, D, E } }
        let qset = QuorumSet::new(
            2,
            nodes(&[1]),
            vec![
                QuorumSet::new(1, nodes(&[2, 3]), vec![]),
                QuorumSet::new(2, nodes(&[4, 5]), vec![]),
            ],
        );
        assert!(is_quorum_slice(&qset, &nodes(&[1, 3])));
        assert!(is_quorum_slice(&qset, &nodes(&[2, 4, 5])));
        assert!(!is_quorum_slice(&qset, &nodes(&[1, 4])));
        assert!(!is_quorum_slice(&qset, &nodes(&[2, 3])));
    }

    #[test]
    fn test_slice_degenerate() {
        assert!(!is_quorum_slice(&QuorumSet::default(), &nodes(&[1])));
        let zero = QuorumSet::new(0, nodes(&[1]), vec![]);
        assert!(!is_quorum_slice(&zero, &nodes(&[1])));
    }

    #[test]
    fn test_singleton_slice() {
        let qset = build_singleton_quorum_set(node(7));
        assert!(is_quorum_slice(&qset, &nodes(&[7])));
        assert!(!is_quorum_slice(&qset, &nodes(&[1, 2])));
    }

    #[test]
    fn test_v_blocking_flat() {
        // 2 of 3 is blocked once 2 validators are out
        let qset = two_of_three();
        assert!(!is_v_blocking(&qset, &nodes(&[1])));
        assert!(is_v_blocking(&qset, &nodes(&[1, 3])));
        assert!(!is_v_blocking(&qset, &nodes(&[])));
    }

    #[test]
    fn test_v_blocking_nested() {
        // { t: 2, A, { t: 2, B, C } }
        let qset = QuorumSet::new(
            2,
            nodes(&[1]),
            vec![QuorumSet::new(2, nodes(&[2, 3]), vec![])],
        );
        assert!(is_v_blocking(&qset, &nodes(&[1])));
        assert!(is_v_blocking(&qset, &nodes(&[3])));
        assert!(!is_v_blocking(&qset, &nodes(&[4])));
    }

    #[test]
    fn test_v_blocking_degenerate() {
        let zero = QuorumSet::new(0, nodes(&[1]), vec![]);
        assert!(!is_v_blocking(&zero, &nodes(&[1])));
        assert!(!is_v_blocking(&QuorumSet::default(), &nodes(&[1])));
    }

    #[test]
    fn test_v_blocking_with_statements() {
        let qset = two_of_three();
        let statements: BTreeMap<NodeId, bool> =
            [(node(1), true), (node(2), false), (node(3), true)].into_iter().collect();

        assert_eq!(relevant_nodes(&statements, |voted| *voted), nodes(&[1, 3]));
        assert!(is_v_blocking_with(&qset, &statements, |voted| *voted));
        assert!(!is_v_blocking_with(&qset, &statements, |voted| !*voted));
    }

    #[test]
    fn test_accepts_sets() {
        let qset = two_of_three();
        let set: BTreeSet<NodeId> = nodes(&[2, 3]).into_iter().collect();
        assert!(is_quorum_slice(&qset, &set));
        assert!(is_v_blocking(&qset, &set));
    }
}
