use federa_core::NodeId;

use crate::quorum_set::QuorumSet;

/// Rewrite a configured quorum set into `{ t: 2, self, { rest } }`, where
/// `rest` is the configuration with `self_id` removed and simplified.
///
/// If nothing is left once `self_id` is removed the result is `{ t: 1, self }`.
/// The input is never modified.
pub fn adjust_quorum_set(self_id: &NodeId, qset: &QuorumSet) -> QuorumSet {
    let mut rest = qset.clone();
    remove_self(self_id, &mut rest);

    let mut adjusted = QuorumSet::new(1, vec![*self_id], Vec::new());
    if rest.threshold != 0 {
        adjusted.threshold += 1;
        adjusted.inner_sets.push(rest);
    }
    adjusted
}

/// Removes `self_id` at every level, drops inner sets whose threshold reached
/// zero, and replaces `{ t: 1, { inner } }` by `inner`.
fn remove_self(self_id: &NodeId, qset: &mut QuorumSet) {
    // inner sets may still have entries when their threshold drops to zero,
    // e.g. { t: 1, self, other }
    let before = qset.inner_sets.len();
    qset.inner_sets.retain_mut(|inner| {
        remove_self(self_id, inner);
        inner.threshold != 0
    });
    let dropped = before - qset.inner_sets.len();
    qset.threshold = qset.threshold.saturating_sub(dropped as u32);

    let before = qset.validators.len();
    qset.validators.retain(|v| v != self_id);
    let removed = before - qset.validators.len();
    qset.threshold = qset.threshold.saturating_sub(removed as u32);

    if qset.threshold == 1 && qset.validators.is_empty() && qset.inner_sets.len() == 1 {
        if let Some(inner) = qset.inner_sets.pop() {
            *qset = inner;
        }
    }
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
    fn test_self_only() {
        let me = node(0);
        let adjusted = adjust_quorum_set(&me, &build_singleton_quorum_set(me));
        assert_eq!(adjusted, build_singleton_quorum_set(me));
    }

    #[test]
    fn test_wraps_remainder() {
        let me = node(0);
        let qset = QuorumSet::new(3, vec![me, node(1), node(2), node(3)], vec![]);
        let adjusted = adjust_quorum_set(&me, &qset);

        assert_eq!(
            adjusted,
            QuorumSet::new(
                2,
                vec![me],
                vec![QuorumSet::new(2, vec![node(1), node(2), node(3)], vec![])]
            )
        );
    }

    #[test]
    fn test_config_without_self() {
        let me = node(0);
        let qset = QuorumSet::new(2, vec![node(1), node(2), node(3)], vec![]);
        let adjusted = adjust_quorum_set(&me, &qset);

        assert_eq!(adjusted.threshold, 2);
        assert_eq!(adjusted.validators, vec![me]);
        assert_eq!(adjusted.inner_sets, vec![qset]);
    }

    #[test]
    fn test_drops_inner_set_satisfied_by_self() {
        let me = node(0);
        // { t: 2, A, { t: 1, self, B } }: the inner set is satisfied by self alone
        let qset = QuorumSet::new(
            2,
            vec![node(1)],
            vec![QuorumSet::new(1, vec![me, node(2)], vec![])],
        );
        let adjusted = adjust_quorum_set(&me, &qset);

        assert_eq!(
            adjusted,
            QuorumSet::new(2, vec![me], vec![QuorumSet::new(1, vec![node(1)], vec![])])
        );
    }

    #[test]
    fn test_collapses_single_inner_set() {
        let me = node(0);
        let inner = QuorumSet::new(2, vec![node(1), node(2), node(3)], vec![]);
        let qset = QuorumSet::new(2, vec![me], vec![inner.clone()]);
        let adjusted = adjust_quorum_set(&me, &qset);

        assert_eq!(adjusted, QuorumSet::new(2, vec![me], vec![inner]));
    }

    #[test]
    fn test_strips_self_at_depth() {
        let me = node(0);
        let qset = QuorumSet::new(
            2,
            vec![node(1), node(2)],
            vec![QuorumSet::new(
                2,
                vec![node(3)],
                vec![QuorumSet::new(2, vec![me, node(4), node(5)], vec![])],
            )],
        );
        let adjusted = adjust_quorum_set(&me, &qset);

        assert!(!adjusted.inner_sets[0].all_nodes().contains(&me));
        let deepest = &adjusted.inner_sets[0].inner_sets[0].inner_sets[0];
        assert_eq!(deepest, &QuorumSet::new(1, vec![node(4), node(5)], vec![]));
    }

    #[test]
    fn test_idempotent() {
        let me = node(0);
        let qset = QuorumSet::new(
            2,
            vec![me, node(1)],
            vec![
                QuorumSet::new(1, vec![me, node(2)], vec![]),
                QuorumSet::new(2, vec![node(3), node(4), node(5)], vec![]),
            ],
        );
        let once = adjust_quorum_set(&me, &qset);
        let twice = adjust_quorum_set(&me, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_untouched() {
        let me = node(0);
        let qset = QuorumSet::new(1, vec![me, node(1)], vec![]);
        let snapshot = qset.clone();
        let _ = adjust_quorum_set(&me, &qset);
        assert_eq!(qset, snapshot);
    }
}
