pub mod hash;
pub mod keys;
pub mod signature;

pub use hash::{hash_blake3, Hash};
pub use keys::{KeyPair, NodeId, PublicKey, SecretKey};
pub use signature::{sign, verify, Sig};
