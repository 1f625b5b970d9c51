use std::fmt;

use federa_core::NodeId;
use serde_json::{json, Value};

use crate::quorum_set::QuorumSet;

/// `{ "t": threshold, "v": [validators..., inner sets...] }`
pub fn to_json<F>(qset: &QuorumSet, name: &F) -> Value
where
    F: Fn(&NodeId) -> String,
{
    let mut entries: Vec<Value> = qset
        .validators
        .iter()
        .map(|v| Value::String(name(v)))
        .collect();
    entries.extend(qset.inner_sets.iter().map(|inner| to_json(inner, name)));

    json!({
        "t": qset.threshold,
        "v": entries,
    })
}

/// Single-line form of [`to_json`]
pub fn to_string<F>(qset: &QuorumSet, name: &F) -> String
where
    F: Fn(&NodeId) -> String,
{
    to_json(qset, name).to_string()
}

impl fmt::Display for QuorumSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_string(self, &NodeId::to_short_hex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use federa_core::PublicKey;

    fn node(i: u8) -> NodeId {
        PublicKey([i; 32])
    }

    #[test]
    fn test_to_json_nested() {
        let qset = QuorumSet::new(
            2,
            vec![node(1)],
            vec![QuorumSet::new(1, vec![node(2), node(3)], vec![])],
        );
        let value = to_json(&qset, &|n: &NodeId| format!("n{}", n.0[0]));

        assert_eq!(
            value,
            json!({ "t": 2, "v": ["n1", { "t": 1, "v": ["n2", "n3"] }] })
        );
    }

    #[test]
    fn test_display_uses_short_hex() {
        let qset = QuorumSet::new(1, vec![node(0xab)], vec![]);
        assert_eq!(qset.to_string(), r#"{"t":1,"v":["abababab"]}"#);
    }

    #[test]
    fn test_empty_entries() {
        let value = to_json(&QuorumSet::default(), &NodeId::to_hex);
        assert_eq!(value, json!({ "t": 0, "v": [] }));
    }
}
