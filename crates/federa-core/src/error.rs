use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid node id")]
    InvalidPublicKey,

    #[error("Invalid secret key length: expected 32 bytes, got {0}")]
    InvalidSecretKeyLength(usize),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
