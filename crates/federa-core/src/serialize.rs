use serde::Serialize;

use crate::error::CoreError;

/// Deterministic bincode bytes; content hashes are computed over these.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
    bincode::serialize(value).map_err(|e| CoreError::Serialization(e.to_string()))
}
