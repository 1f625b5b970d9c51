use federa_core::{CoreError, NodeId};
use thiserror::Error;

/// Reasons a quorum set must not be trusted, plus failures hashing one.
#[derive(Debug, Error)]
pub enum QuorumError {
    #[error("Threshold {threshold} out of range for {entries} entries at depth {depth}")]
    ThresholdOutOfRange {
        threshold: u32,
        entries: usize,
        depth: usize,
    },

    #[error("Validator {0} appears more than once")]
    DuplicateValidator(NodeId),

    #[error("Quorum set nested {depth} levels deep, limit is {max}")]
    NestingTooDeep { depth: usize, max: usize },

    #[error("Quorum set names {count} validators, limit is {max}")]
    TooManyValidators { count: usize, max: usize },

    #[error("Quorum set for {0} does not include that node")]
    MissingSelf(NodeId),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
