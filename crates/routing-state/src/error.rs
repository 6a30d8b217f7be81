//! Error types for routing state records.
//!
//! All errors are strongly typed and propagated without panicking.
//! Private key material is never included in error messages.

/// Errors covering record construction, authentication, and key storage.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Envelope authentication failed: {0}")]
    Authentication(String),

    #[error("unexpected envelope payload type: expected {expected}, got {actual}")]
    SchemaMismatch { expected: String, actual: String },

    #[error("Malformed record payload: {0}")]
    MalformedPayload(String),

    #[error("peer id in routing state record does not match signing key")]
    IdentityBinding,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid peer id: {0}")]
    InvalidPeerId(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid passphrase")]
    InvalidPassphrase,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecordError {
    /// True for failures that indicate a forged or replayed record rather
    /// than corruption or a local fault.
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_) | Self::IdentityBinding | Self::SchemaMismatch { .. }
        )
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, RecordError>;
