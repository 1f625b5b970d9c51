use federa_core::NodeId;

use crate::quorum_set::QuorumSet;

/// Computes `a * b / c` rounding down, through a 128-bit intermediate.
///
/// Returns `None` when `c` is zero or the quotient does not fit in a `u64`.
pub fn big_divide(a: u64, b: u64, c: u64) -> Option<u64> {
    if c == 0 {
        return None;
    }
    let wide = u128::from(a) * u128::from(b) / u128::from(c);
    u64::try_from(wide).ok()
}

/// Share of `qset` that `node_id` controls, as a fraction of `u64::MAX`.
///
/// A validator at some level weighs `threshold / entries` of that level, and
/// weights multiply on the way up. Absent nodes weigh 0. If a node appears
/// more than once only its first occurrence counts.
pub fn node_weight(node_id: &NodeId, qset: &QuorumSet) -> u64 {
    let n = u64::from(qset.threshold);
    let d = qset.total_entries() as u64;

    if qset.validators.contains(node_id) {
        return scale(u64::MAX, n, d);
    }

    for inner in &qset.inner_sets {
        let leaf = node_weight(node_id, inner);
        if leaf != 0 {
            return scale(leaf, n, d);
        }
    }

    0
}

fn scale(weight: u64, n: u64, d: u64) -> u64 {
    // only a threshold above the entry count overflows
    big_divide(weight, n, d).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum_set::build_singleton_quorum_set;
    use federa_core::PublicKey;

    fn node(i: u8) -> NodeId {
        PublicKey([i; 32])
    }

    #[test]
    fn test_big_divide() {
        assert_eq!(big_divide(10, 3, 4), Some(7));
        assert_eq!(big_divide(u64::MAX, 1, 2), Some(u64::MAX / 2));
        assert_eq!(big_divide(u64::MAX, 2, 3), Some(12_297_829_382_473_034_410));
        assert_eq!(big_divide(u64::MAX, 3, 3), Some(u64::MAX));
        assert_eq!(big_divide(1, 1, 0), None);
        assert_eq!(big_divide(u64::MAX, 2, 1), None);
    }

    #[test]
    fn test_weight_one_of_two() {
        let qset = QuorumSet::new(1, vec![node(1), node(2)], vec![]);
        assert_eq!(node_weight(&node(1), &qset), u64::MAX / 2);
        assert_eq!(node_weight(&node(2), &qset), u64::MAX / 2);
        assert_eq!(node_weight(&node(3), &qset), 0);
    }

    #[test]
    fn test_singleton_full_weight() {
        let qset = build_singleton_quorum_set(node(1));
        assert_eq!(node_weight(&node(1), &qset), u64::MAX);
    }

    #[test]
    fn test_weights_compose_down_the_tree() {
        // { t: 1, A, { t: 2, B, C } }: B weighs 1/2 * 2/2
        let qset = QuorumSet::new(
            1,
            vec![node(1)],
            vec![QuorumSet::new(2, vec![node(2), node(3)], vec![])],
        );
        assert_eq!(node_weight(&node(1), &qset), u64::MAX / 2);
        assert_eq!(node_weight(&node(2), &qset), u64::MAX / 2);

        // { t: 2, A, B, { t: 1, C, D } }: C weighs 2/3 * 1/2
        let qset = QuorumSet::new(
            2,
            vec![node(1), node(2)],
            vec![QuorumSet::new(1, vec![node(3), node(4)], vec![])],
        );
        let expected = big_divide(u64::MAX / 2, 2, 3).unwrap();
        assert_eq!(node_weight(&node(3), &qset), expected);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let qset = QuorumSet::new(
            1,
            vec![node(1), node(2)],
            vec![QuorumSet::new(1, vec![node(1)], vec![])],
        );
        assert_eq!(node_weight(&node(1), &qset), big_divide(u64::MAX, 1, 3).unwrap());
    }
}
