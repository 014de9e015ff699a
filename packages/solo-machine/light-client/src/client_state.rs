//! Solo machine client state for IBC light client

use ibc_proto::google::protobuf::Any;
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::{
    consensus_state::ConsensusState,
    error::SoloMachineClientError,
    public_key::PublicKey,
    types::{solomachine::ClientState as RawClientState, SOLO_MACHINE_CLIENT_STATE_TYPE_URL},
};

/// Lifecycle status of a solo machine client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Proofs are verified and headers accepted
    Active,
    /// Misbehaviour was proven; terminal
    Frozen,
}

/// The light client's trust anchor.
///
/// Only header processing advances `sequence`, and only misbehaviour sets `is_frozen`.
/// Both produce a new value rather than mutating a shared one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Sequence the next proof or header must be signed at
    pub sequence: u64,
    /// Whether the client is frozen due to misbehaviour
    pub is_frozen: bool,
    /// Currently trusted key context
    pub consensus_state: ConsensusState,
}

impl ClientState {
    /// Instantiate an active client at `sequence`.
    #[must_use]
    pub const fn new(sequence: u64, consensus_state: ConsensusState) -> Self {
        Self {
            sequence,
            is_frozen: false,
            consensus_state,
        }
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> Status {
        if self.is_frozen {
            Status::Frozen
        } else {
            Status::Active
        }
    }

    /// The key proofs at the current sequence must be signed with.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.consensus_state.public_key
    }

    /// Timestamp of the trusted consensus state.
    #[must_use]
    pub const fn latest_timestamp(&self) -> u64 {
        self.consensus_state.timestamp
    }

    /// Validates the embedded consensus state.
    ///
    /// # Errors
    /// See [`ConsensusState::validate`].
    pub fn validate(&self) -> Result<(), SoloMachineClientError> {
        self.consensus_state.validate()
    }

    /// Pack the client state as a protobuf `Any`.
    #[must_use]
    pub fn to_any(&self) -> Any {
        Any {
            type_url: SOLO_MACHINE_CLIENT_STATE_TYPE_URL.to_string(),
            value: RawClientState::from(self.clone()).encode_to_vec(),
        }
    }
}

impl From<ClientState> for RawClientState {
    fn from(value: ClientState) -> Self {
        Self {
            sequence: value.sequence,
            is_frozen: value.is_frozen,
            consensus_state: Some(value.consensus_state.into()),
        }
    }
}

impl TryFrom<RawClientState> for ClientState {
    type Error = SoloMachineClientError;

    fn try_from(raw: RawClientState) -> Result<Self, Self::Error> {
        let consensus_state = raw
            .consensus_state
            .ok_or_else(|| SoloMachineClientError::invalid_input("missing consensus state"))?;

        Ok(Self {
            sequence: raw.sequence,
            is_frozen: raw.is_frozen,
            consensus_state: consensus_state.try_into()?,
        })
    }
}

impl TryFrom<&Any> for ClientState {
    type Error = SoloMachineClientError;

    fn try_from(any: &Any) -> Result<Self, Self::Error> {
        if any.type_url != SOLO_MACHINE_CLIENT_STATE_TYPE_URL {
            return Err(SoloMachineClientError::invalid_input(format!(
                "expected type {SOLO_MACHINE_CLIENT_STATE_TYPE_URL}, got {}",
                any.type_url
            )));
        }
        RawClientState::decode(any.value.as_slice())?.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SoloMachine;

    #[test]
    fn new_client_is_active() {
        let cs = SoloMachine::ed25519(1, "testing").client_state(0, 100);
        assert_eq!(cs.sequence, 0);
        assert_eq!(cs.status(), Status::Active);
        assert_eq!(cs.latest_timestamp(), 100);
    }

    #[test]
    fn frozen_flag_drives_status() {
        let mut cs = SoloMachine::ed25519(1, "testing").client_state(5, 100);
        cs.is_frozen = true;
        assert_eq!(cs.status(), Status::Frozen);
    }

    #[test]
    fn packs_and_unpacks_through_any() {
        let cs = SoloMachine::secp256k1(1, "testing").client_state(9, 100);
        let any = cs.to_any();
        assert_eq!(any.type_url, SOLO_MACHINE_CLIENT_STATE_TYPE_URL);
        assert_eq!(ClientState::try_from(&any).unwrap(), cs);
    }

    #[test]
    fn unpacking_other_types_is_invalid_input() {
        let cs = SoloMachine::secp256k1(1, "testing").client_state(9, 100);
        let mut any = cs.to_any();
        any.type_url = "/ibc.lightclients.tendermint.v1.ClientState".to_string();
        assert!(matches!(
            ClientState::try_from(&any),
            Err(SoloMachineClientError::InvalidInput { .. })
        ));
    }

    #[test]
    fn json_round_trip() {
        let cs = SoloMachine::ed25519(2, "testing").client_state(3, 100);
        let json = serde_json::to_string(&cs).unwrap();
        assert_eq!(serde_json::from_str::<ClientState>(&json).unwrap(), cs);
    }
}
