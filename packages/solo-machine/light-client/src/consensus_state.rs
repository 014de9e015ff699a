//! Solo machine consensus state: the trusted key and its context

use ibc_proto::google::protobuf::Any;
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::{
    ensure,
    error::SoloMachineClientError,
    public_key::PublicKey,
    types::{solomachine::ConsensusState as RawConsensusState, SOLO_MACHINE_CONSENSUS_STATE_TYPE_URL},
};

/// The key the solo machine is currently trusted to sign with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    /// Currently trusted public key
    pub public_key: PublicKey,
    /// Domain separation string bound into every signature
    pub diversifier: String,
    /// Timestamp of the last accepted update
    pub timestamp: u64,
}

impl ConsensusState {
    /// Checks the fields that cannot be enforced by the type system.
    ///
    /// # Errors
    /// Returns [`SoloMachineClientError::InvalidInput`] if the diversifier is only whitespace.
    pub fn validate(&self) -> Result<(), SoloMachineClientError> {
        validate_diversifier(&self.diversifier)
    }

    /// Pack the consensus state as a protobuf `Any`.
    #[must_use]
    pub fn to_any(&self) -> Any {
        Any {
            type_url: SOLO_MACHINE_CONSENSUS_STATE_TYPE_URL.to_string(),
            value: RawConsensusState::from(self.clone()).encode_to_vec(),
        }
    }
}

/// An empty diversifier is allowed, one made only of whitespace is not.
pub(crate) fn validate_diversifier(diversifier: &str) -> Result<(), SoloMachineClientError> {
    ensure!(
        diversifier.is_empty() || !diversifier.trim().is_empty(),
        SoloMachineClientError::invalid_input("diversifier cannot contain only spaces")
    );
    Ok(())
}

impl From<ConsensusState> for RawConsensusState {
    fn from(value: ConsensusState) -> Self {
        Self {
            public_key: Some(value.public_key.to_any()),
            diversifier: value.diversifier,
            timestamp: value.timestamp,
        }
    }
}

impl TryFrom<RawConsensusState> for ConsensusState {
    type Error = SoloMachineClientError;

    fn try_from(raw: RawConsensusState) -> Result<Self, Self::Error> {
        let public_key = raw
            .public_key
            .as_ref()
            .ok_or_else(|| SoloMachineClientError::invalid_input("missing public key"))?;

        let consensus_state = Self {
            public_key: PublicKey::try_from(public_key)?,
            diversifier: raw.diversifier,
            timestamp: raw.timestamp,
        };
        consensus_state.validate()?;

        Ok(consensus_state)
    }
}
