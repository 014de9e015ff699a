#![doc = "Solo machine light client for IBC"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]
#![allow(clippy::module_name_repetitions)]

// Self dev-dependency enables `test-utils` for integration tests; unused in unit tests.
#[cfg(test)]
use solo_machine_light_client as _;

pub mod client;
pub mod client_state;
pub mod config;
pub mod consensus_state;
pub mod error;
pub mod header;
pub mod membership;
pub mod misbehaviour;
pub mod path;
pub mod public_key;
pub mod sign_bytes;
pub mod signature;
pub mod types;
pub mod update;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{ClientSnapshot, SoloMachineClient};
pub use client_state::{ClientState, Status};
pub use config::{ClientConfig, TimestampPolicy};
pub use consensus_state::ConsensusState;
pub use error::{ErrorKind, SoloMachineClientError};
pub use header::Header;
pub use misbehaviour::{Misbehaviour, SignatureAndData};
pub use public_key::{PublicKey, SignatureScheme};
pub use sign_bytes::ProvableValue;

/// Ensure that a condition is true, otherwise return an error.
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub(crate) use ensure;
