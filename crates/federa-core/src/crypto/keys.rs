use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Identity of a consensus participant.
///
/// Nodes are named by their Ed25519 verifying key; the quorum engine only
/// relies on byte-wise equality, ordering and hashing.
pub type NodeId = PublicKey;

/// Ed25519 verifying key bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Parse the 64-character hex form used in configuration files
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes: [u8; 32] = hex::decode(s)?
            .try_into()
            .map_err(|_| CoreError::InvalidPublicKey)?;
        Ok(PublicKey(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 4 bytes as hex, for logs and quorum-set dumps
    pub fn to_short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    pub(crate) fn verifying_key(&self) -> Result<VerifyingKey, CoreError> {
        VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.to_short_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Ed25519 signing seed of the local node. Never serialized.
#[derive(Clone)]
pub struct SecretKey(SigningKey);

impl SecretKey {
    pub fn generate() -> Self {
        SecretKey(SigningKey::generate(&mut OsRng))
    }

    pub fn from_bytes(seed: &[u8; 32]) -> Self {
        SecretKey(SigningKey::from_bytes(seed))
    }

    /// Parse a hex seed, as stored in `node_secret`
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::InvalidSecretKeyLength(bytes.len()))?;
        Ok(Self::from_bytes(&seed))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    /// The node id this seed signs for
    pub fn public_key(&self) -> NodeId {
        PublicKey(self.0.verifying_key().to_bytes())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Seed and node id generated together
#[derive(Clone)]
pub struct KeyPair {
    pub secret: SecretKey,
    pub public: NodeId,
}

impl KeyPair {
    pub fn generate() -> Self {
        Self::from_secret(SecretKey::generate())
    }

    /// Deterministic key pair, mostly for fixtures
    pub fn from_secret_bytes(seed: &[u8; 32]) -> Self {
        Self::from_secret(SecretKey::from_bytes(seed))
    }

    fn from_secret(secret: SecretKey) -> Self {
        let public = secret.public_key();
        KeyPair { secret, public }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({:?})", self.public)
    }
}
