use std::collections::BTreeSet;
use std::sync::Arc;

use federa_core::{sign, Hash, NodeId, SecretKey, Sig};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::QuorumError;
use crate::normalize::adjust_quorum_set;
use crate::quorum_set::{build_singleton_quorum_set, QuorumSet};
use crate::render;
use crate::sanity::{check_well_formed, SanityLimits};

/// The node running the consensus protocol: its identity and the quorum set
/// it currently uses.
pub struct LocalNode {
    node_id: NodeId,
    secret_key: SecretKey,
    is_validator: bool,
    limits: SanityLimits,
    quorum_set: QuorumSet,
    quorum_set_hash: Hash,
    single_quorum_set: Arc<QuorumSet>,
    single_quorum_set_hash: Hash,
}

impl LocalNode {
    /// Create the local node from its configured quorum set, which is
    /// canonicalized so the node itself always has a say.
    pub fn new(
        secret_key: SecretKey,
        is_validator: bool,
        quorum_set: &QuorumSet,
        limits: SanityLimits,
    ) -> Result<Self, QuorumError> {
        let node_id = secret_key.public_key();
        let quorum_set = adjust_quorum_set(&node_id, quorum_set);
        let quorum_set_hash = quorum_set.hash()?;

        let single_quorum_set = Self::singleton_quorum_set(&node_id);
        let single_quorum_set_hash = single_quorum_set.hash()?;

        info!(
            "LocalNode {} validator: {} qset: {}",
            node_id.to_short_hex(),
            is_validator,
            quorum_set_hash.abbrev()
        );

        Ok(LocalNode {
            node_id,
            secret_key,
            is_validator,
            limits,
            quorum_set,
            quorum_set_hash,
            single_quorum_set,
            single_quorum_set_hash,
        })
    }

    /// Trust configuration for a node whose quorum set is unknown
    pub fn singleton_quorum_set(node_id: &NodeId) -> Arc<QuorumSet> {
        Arc::new(build_singleton_quorum_set(*node_id))
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn is_validator(&self) -> bool {
        self.is_validator
    }

    pub fn limits(&self) -> &SanityLimits {
        &self.limits
    }

    pub fn quorum_set(&self) -> &QuorumSet {
        &self.quorum_set
    }

    pub fn quorum_set_hash(&self) -> &Hash {
        &self.quorum_set_hash
    }

    pub fn single_quorum_set(&self) -> Arc<QuorumSet> {
        Arc::clone(&self.single_quorum_set)
    }

    pub fn single_quorum_set_hash(&self) -> &Hash {
        &self.single_quorum_set_hash
    }

    /// Replace the quorum set as given and rehash it.
    ///
    /// The set is not canonicalized again; pass one that already is.
    pub fn update_quorum_set(&mut self, quorum_set: QuorumSet) -> Result<(), QuorumError> {
        let hash = quorum_set.hash()?;
        info!(
            "LocalNode {} qset: {} -> {}",
            self.node_id.to_short_hex(),
            self.quorum_set_hash.abbrev(),
            hash.abbrev()
        );
        self.quorum_set_hash = hash;
        self.quorum_set = quorum_set;
        Ok(())
    }

    /// Sign a message with this node's key
    pub fn sign(&self, message: &[u8]) -> Sig {
        sign(&self.secret_key, message)
    }

    /// Why `quorum_set`, announced as the configuration of `node_id`, must
    /// not be trusted, if anything.
    ///
    /// Besides being well formed, the set has to name `node_id` itself;
    /// only a non-validating local node may leave itself out of its own set.
    pub fn check_quorum_set(
        &self,
        node_id: &NodeId,
        quorum_set: &QuorumSet,
    ) -> Result<(), QuorumError> {
        let mut all_validators = BTreeSet::new();
        check_well_formed(quorum_set, &self.limits, &mut all_validators)?;

        let watcher_self = !self.is_validator && *node_id == self.node_id;
        if all_validators.contains(node_id) || watcher_self {
            Ok(())
        } else {
            debug!("Quorum set of {} does not name it", node_id.to_short_hex());
            Err(QuorumError::MissingSelf(*node_id))
        }
    }

    pub fn is_quorum_set_sane(&self, node_id: &NodeId, quorum_set: &QuorumSet) -> bool {
        self.check_quorum_set(node_id, quorum_set).is_ok()
    }

    pub fn to_json(&self, quorum_set: &QuorumSet) -> Value {
        render::to_json(quorum_set, &NodeId::to_short_hex)
    }

    pub fn render(&self, quorum_set: &QuorumSet) -> String {
        render::to_string(quorum_set, &NodeId::to_short_hex)
    }
}
