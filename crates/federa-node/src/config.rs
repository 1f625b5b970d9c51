use std::path::Path;

use anyhow::{anyhow, Result};
use federa_core::{KeyPair, NodeId, PublicKey, SecretKey};
use federa_quorum::{LocalNode, QuorumSet, SanityLimits};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node secret key (hex seed); a throwaway key is used when absent
    pub node_secret: Option<String>,

    /// Whether this node votes, or only watches
    pub is_validator: bool,

    /// Configured quorum set, before canonicalization
    pub quorum_set: QuorumSetFile,

    /// Bounds for accepting quorum sets
    #[serde(default)]
    pub limits: SanityLimits,
}

/// Quorum set as written in configuration files, with hex node ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumSetFile {
    pub threshold: u32,
    #[serde(default)]
    pub validators: Vec<String>,
    #[serde(default)]
    pub inner_sets: Vec<QuorumSetFile>,
}

impl QuorumSetFile {
    /// Convert to the engine type, failing on any malformed node id
    pub fn to_quorum_set(&self) -> Result<QuorumSet> {
        let validators: Result<Vec<NodeId>> = self
            .validators
            .iter()
            .map(|s| PublicKey::from_hex(s).map_err(|e| anyhow!("validator {}: {}", s, e)))
            .collect();

        let inner_sets: Result<Vec<QuorumSet>> = self
            .inner_sets
            .iter()
            .map(QuorumSetFile::to_quorum_set)
            .collect();

        Ok(QuorumSet::new(self.threshold, validators?, inner_sets?))
    }

    pub fn from_quorum_set(qset: &QuorumSet) -> Self {
        QuorumSetFile {
            threshold: qset.threshold,
            validators: qset.validators.iter().map(PublicKey::to_hex).collect(),
            inner_sets: qset.inner_sets.iter().map(QuorumSetFile::from_quorum_set).collect(),
        }
    }
}

impl NodeConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NodeConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn secret_key(&self) -> Result<SecretKey> {
        match self.node_secret {
            Some(ref key_hex) => Ok(SecretKey::from_hex(key_hex)?),
            None => {
                warn!("No node_secret configured, using a throwaway key");
                Ok(SecretKey::generate())
            }
        }
    }

    /// Build the local node; its quorum set is canonicalized on the way
    pub fn to_local_node(&self) -> Result<LocalNode> {
        let qset = self.quorum_set.to_quorum_set()?;
        Ok(LocalNode::new(self.secret_key()?, self.is_validator, &qset, self.limits)?)
    }
}

/// Generate a sample configuration: a 3-of-4 including the node itself
pub fn generate_sample_config() -> NodeConfig {
    let node = KeyPair::generate();
    let peers: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();

    let mut validators = vec![node.public.to_hex()];
    validators.extend(peers.iter().map(|p| p.public.to_hex()));

    NodeConfig {
        node_secret: Some(node.secret.to_hex()),
        is_validator: true,
        quorum_set: QuorumSetFile {
            threshold: 3,
            validators,
            inner_sets: Vec::new(),
        },
        limits: SanityLimits::default(),
    }
}
