//! Federa Core - Node identity, hashing, and serialization
//!
//! This crate provides the primitives the quorum-set engine builds on:
//! Ed25519 node identities, Blake3 content hashes, and the deterministic
//! encoding quorum sets are hashed over.

pub mod crypto;
pub mod error;
pub mod serialize;

pub use crypto::{hash_blake3, sign, verify, Hash, KeyPair, NodeId, PublicKey, SecretKey, Sig};
pub use error::CoreError;
