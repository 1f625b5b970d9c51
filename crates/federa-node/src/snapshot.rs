use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use federa_core::{NodeId, PublicKey};
use federa_quorum::{
    find_closest_v_blocking_with, is_quorum, is_v_blocking_with, transitive_pool, LocalNode,
    QuorumSet,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::QuorumSetFile;

/// One peer statement as stored in a snapshot file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerStatementFile {
    pub node: String,
    pub quorum_set: QuorumSetFile,
    #[serde(default)]
    pub voted: bool,
}

/// A statement the local node accepted
#[derive(Debug, Clone)]
pub struct PeerStatement {
    pub quorum_set: Arc<QuorumSet>,
    pub voted: bool,
}

/// Statements keyed by sender, plus the senders whose quorum set was refused
#[derive(Debug, Default)]
pub struct Snapshot {
    pub statements: BTreeMap<NodeId, PeerStatement>,
    pub rejected: Vec<(NodeId, String)>,
}

/// Result of evaluating a snapshot from the local node's point of view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub accepted: usize,
    pub rejected: usize,
    pub voted: usize,
    pub transitive_pool: Vec<String>,
    pub is_quorum: bool,
    pub is_v_blocking: bool,
    pub closest_v_blocking: Vec<String>,
}

pub fn load_statements(path: &Path) -> Result<Vec<PeerStatementFile>> {
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<PeerStatementFile> = serde_json::from_str(&content)?;
    Ok(entries)
}

/// Parse statements and drop those whose quorum set the local node would not
/// trust. Two statements from the same sender are an error.
pub fn build_snapshot(local: &LocalNode, entries: Vec<PeerStatementFile>) -> Result<Snapshot> {
    let mut snapshot = Snapshot::default();

    for entry in entries {
        let node = PublicKey::from_hex(&entry.node).map_err(|e| anyhow!("node {}: {}", entry.node, e))?;
        if snapshot.statements.contains_key(&node)
            || snapshot.rejected.iter().any(|(n, _)| *n == node)
        {
            bail!("duplicate statement from {}", entry.node);
        }

        let qset = entry.quorum_set.to_quorum_set()?;
        match local.check_quorum_set(&node, &qset) {
            Ok(()) => {
                debug!("Accepted statement from {}", node.to_short_hex());
                snapshot.statements.insert(
                    node,
                    PeerStatement {
                        quorum_set: Arc::new(qset),
                        voted: entry.voted,
                    },
                );
            }
            Err(e) => {
                warn!("Rejected statement from {}: {}", node.to_short_hex(), e);
                snapshot.rejected.push((node, e.to_string()));
            }
        }
    }

    Ok(snapshot)
}

fn qset_of(statement: &PeerStatement) -> Option<Arc<QuorumSet>> {
    Some(Arc::clone(&statement.quorum_set))
}

fn voted(statement: &PeerStatement) -> bool {
    statement.voted
}

pub fn evaluate(local: &LocalNode, snapshot: &Snapshot) -> Evaluation {
    let qset = local.quorum_set();
    let statements = &snapshot.statements;

    let pool = transitive_pool(statements, qset_of, voted);

    Evaluation {
        accepted: statements.len(),
        rejected: snapshot.rejected.len(),
        voted: statements.values().filter(|s| s.voted).count(),
        transitive_pool: pool.nodes.iter().map(PublicKey::to_hex).collect(),
        is_quorum: is_quorum(qset, statements, qset_of, voted),
        is_v_blocking: is_v_blocking_with(qset, statements, voted),
        closest_v_blocking: find_closest_v_blocking_with(qset, statements, voted)
            .iter()
            .map(PublicKey::to_hex)
            .collect(),
    }
}
