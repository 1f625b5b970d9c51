//! Federa Quorum - Quorum-set algebra for federated Byzantine agreement
//!
//! This crate decides, from a node's own trust configuration and the trust
//! configurations its peers announce, whether a set of statements forms a
//! quorum or a v-blocking set. It also validates and canonicalizes quorum
//! sets and renders them for diagnostics.
//!
//! All evaluation functions are pure and only meaningful on quorum sets that
//! passed [`LocalNode::check_quorum_set`]; reject anything else first.

pub mod error;
pub mod federated;
pub mod local_node;
pub mod normalize;
pub mod predicates;
pub mod quorum_set;
pub mod render;
pub mod sanity;
pub mod weight;

pub use error::QuorumError;
pub use federated::{
    find_closest_v_blocking, find_closest_v_blocking_with, is_quorum, transitive_pool,
    TransitivePool,
};
pub use local_node::LocalNode;
pub use normalize::adjust_quorum_set;
pub use predicates::{is_quorum_slice, is_v_blocking, is_v_blocking_with, relevant_nodes};
pub use quorum_set::{build_singleton_quorum_set, for_all_nodes, NodeSet, QuorumSet};
pub use sanity::{check_well_formed, is_well_formed, SanityLimits};
pub use weight::{big_divide, node_weight};

pub use federa_core::{Hash, NodeId};
