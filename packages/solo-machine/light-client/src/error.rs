//! Error types for the solo machine light client

use thiserror::Error;

/// Main error type for solo machine client operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SoloMachineClientError {
    /// The signature does not verify against the trusted public key.
    /// Carries no detail about the cause.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// The proof was produced for a different sequence than the client's
    #[error("sequence mismatch: client is at sequence {expected}, proof is for {actual}")]
    SequenceMismatch {
        /// Current client sequence
        expected: u64,
        /// Sequence supplied by the caller
        actual: u64,
    },

    /// Client is frozen
    #[error("client is frozen")]
    ClientFrozen,

    /// A structurally wrong value was supplied for the requested proof kind
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Reason for error
        reason: String,
    },

    /// The proof timestamp is behind the trusted consensus state timestamp
    #[error("timestamp {timestamp} is not after the trusted consensus timestamp {trusted}")]
    TimestampNotIncreasing {
        /// Timestamp supplied with the proof or header
        timestamp: u64,
        /// Timestamp of the trusted consensus state
        trusted: u64,
    },

    /// Invalid header format
    #[error("invalid header: {reason}")]
    InvalidHeader {
        /// Reason for error
        reason: String,
    },

    /// Public key type url is not backed by a known signature scheme
    #[error("unsupported public key type: {0}")]
    UnsupportedScheme(String),

    /// Canonical encoding failed
    #[error("failed to encode canonical bytes: {0}")]
    Encode(#[from] prost::EncodeError),

    /// Canonical decoding failed
    #[error("failed to decode canonical bytes: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// The coarse classes callers use to tell a bad proof from a bad call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The signature did not match
    VerificationFailure,
    /// The proof sequence is not the client's sequence
    SequenceViolation,
    /// The client is terminal
    Frozen,
    /// The caller passed a value of the wrong shape
    InvalidInput,
    /// The canonical serializer failed
    Encoding,
}

impl SoloMachineClientError {
    /// Shorthand for [`SoloMachineClientError::InvalidInput`]
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SoloMachineClientError::InvalidHeader`]
    pub(crate) fn invalid_header(reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            reason: reason.into(),
        }
    }

    /// Returns the error class this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SignatureVerificationFailed => ErrorKind::VerificationFailure,
            Self::SequenceMismatch { .. } => ErrorKind::SequenceViolation,
            Self::ClientFrozen => ErrorKind::Frozen,
            Self::InvalidInput { .. }
            | Self::TimestampNotIncreasing { .. }
            | Self::InvalidHeader { .. }
            | Self::UnsupportedScheme(_) => ErrorKind::InvalidInput,
            Self::Encode(_) | Self::Decode(_) => ErrorKind::Encoding,
        }
    }
}
