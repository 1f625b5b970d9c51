use std::collections::BTreeSet;

use federa_core::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::QuorumError;
use crate::quorum_set::QuorumSet;

/// Deepest inner-set nesting accepted below the root
pub const MAXIMUM_QUORUM_NESTING_LEVEL: usize = 4;

/// Most distinct validators a single quorum set may name
pub const MAXIMUM_QUORUM_NODES: usize = 1000;

/// Bounds applied while checking a quorum set, keeping recursion over
/// untrusted trees shallow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityLimits {
    pub max_nesting_depth: usize,
    pub max_validators: usize,
}

impl Default for SanityLimits {
    fn default() -> Self {
        SanityLimits {
            max_nesting_depth: MAXIMUM_QUORUM_NESTING_LEVEL,
            max_validators: MAXIMUM_QUORUM_NODES,
        }
    }
}

/// Check that every threshold is in `[1, entries]` and that no node appears
/// twice anywhere in the tree. Every validator visited is added to `known`.
pub fn check_well_formed(
    qset: &QuorumSet,
    limits: &SanityLimits,
    known: &mut BTreeSet<NodeId>,
) -> Result<(), QuorumError> {
    let result = check_level(qset, limits, 0, known);
    if let Err(ref e) = result {
        debug!("Rejecting quorum set: {}", e);
    }
    result
}

/// [`check_well_formed`] without the reason
pub fn is_well_formed(
    qset: &QuorumSet,
    limits: &SanityLimits,
    known: &mut BTreeSet<NodeId>,
) -> bool {
    check_well_formed(qset, limits, known).is_ok()
}

fn check_level(
    qset: &QuorumSet,
    limits: &SanityLimits,
    depth: usize,
    known: &mut BTreeSet<NodeId>,
) -> Result<(), QuorumError> {
    if depth > limits.max_nesting_depth {
        return Err(QuorumError::NestingTooDeep {
            depth,
            max: limits.max_nesting_depth,
        });
    }

    let entries = qset.total_entries();
    if qset.threshold < 1 || qset.threshold as usize > entries {
        return Err(QuorumError::ThresholdOutOfRange {
            threshold: qset.threshold,
            entries,
            depth,
        });
    }

    for node in &qset.validators {
        if !known.insert(*node) {
            return Err(QuorumError::DuplicateValidator(*node));
        }
    }

    if known.len() > limits.max_validators {
        return Err(QuorumError::TooManyValidators {
            count: known.len(),
            max: limits.max_validators,
        });
    }

    for inner in &qset.inner_sets {
        check_level(inner, limits, depth + 1, known)?;
    }

    Ok(())
}
