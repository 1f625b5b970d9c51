use ed25519_dalek::{Signature, Signer, Verifier};
use std::fmt;

use crate::crypto::keys::{NodeId, SecretKey};
use crate::error::CoreError;

/// Detached Ed25519 signature by a node
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Sig(pub [u8; 64]);

impl fmt::Debug for Sig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sig({}..)", hex::encode(&self.0[..8]))
    }
}

pub fn sign(secret_key: &SecretKey, message: &[u8]) -> Sig {
    Sig(secret_key.signing_key().sign(message).to_bytes())
}

/// Check that `node_id` signed `message`
pub fn verify(node_id: &NodeId, message: &[u8], signature: &Sig) -> Result<(), CoreError> {
    node_id
        .verifying_key()?
        .verify(message, &Signature::from_bytes(&signature.0))
        .map_err(|_| CoreError::InvalidSignature)
}
