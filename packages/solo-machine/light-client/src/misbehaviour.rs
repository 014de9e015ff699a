//! Misbehaviour detection: two conflicting statements signed at one sequence

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use tracing::warn;

use crate::{
    client_state::ClientState,
    ensure,
    error::SoloMachineClientError,
    sign_bytes::{encode, envelope},
    signature::verify_signature,
    types::{
        sign_data::SignData,
        solomachine::{
            Misbehaviour as RawMisbehaviour, SignatureAndData as RawSignatureAndData,
        },
        ChannelStateData, ClientStateData, ConnectionStateData, ConsensusStateData, DataType,
        HeaderData, NextSequenceRecvData, PacketAcknowledgementAbsenceData,
        PacketAcknowledgementData, PacketCommitmentData,
    },
};

/// A payload and the signature the solo machine produced over it.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureAndData {
    /// Signature over the sign bytes envelope wrapping `data`
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
    /// Kind of `data`
    pub data_type: DataType,
    /// Encoded kind-specific payload
    #[serde_as(as = "Hex")]
    pub data: Vec<u8>,
}

/// Evidence that the solo machine signed two conflicting facts at one sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misbehaviour {
    /// Sequence both statements were signed at
    pub sequence: u64,
    /// First statement
    pub signature_one: SignatureAndData,
    /// Second statement
    pub signature_two: SignatureAndData,
}

/// Checks whether `misbehaviour` proves the solo machine dishonest.
///
/// Both statements must verify under the client's current key and diversifier at
/// `misbehaviour.sequence`. They conflict when they are of the same kind, about the same path,
/// and differ in content once their timestamps are disregarded. Statements about different
/// paths or kinds are not misbehaviour: a solo machine signs many facts per sequence.
///
/// Returns `Ok(false)` for valid but non-conflicting statements.
///
/// # Errors
/// Returns an error if:
/// - The client is frozen
/// - Either signature does not verify
/// - Either payload does not decode as its declared kind
pub fn check_misbehaviour(
    client_state: &ClientState,
    misbehaviour: &Misbehaviour,
) -> Result<bool, SoloMachineClientError> {
    ensure!(!client_state.is_frozen, SoloMachineClientError::ClientFrozen);

    let (one, two) = (&misbehaviour.signature_one, &misbehaviour.signature_two);
    verify_signature_and_data(client_state, misbehaviour.sequence, one)?;
    verify_signature_and_data(client_state, misbehaviour.sequence, two)?;

    if one.data_type != two.data_type {
        return Ok(false);
    }

    let (path_one, fact_one) = fact(one.data_type, &one.data)?;
    let (path_two, fact_two) = fact(two.data_type, &two.data)?;

    Ok(path_one == path_two && fact_one != fact_two)
}

/// Freezes the client. Frozen is terminal.
#[must_use]
pub fn update_state_on_misbehaviour(client_state: &ClientState) -> ClientState {
    warn!(
        sequence = client_state.sequence,
        "solo machine misbehaviour detected, freezing client"
    );
    ClientState {
        is_frozen: true,
        ..client_state.clone()
    }
}

fn verify_signature_and_data(
    client_state: &ClientState,
    sequence: u64,
    signature_and_data: &SignatureAndData,
) -> Result<(), SoloMachineClientError> {
    let sign_bytes = envelope(
        sequence,
        &client_state.consensus_state.diversifier,
        signature_and_data.data_type,
        signature_and_data.data.clone(),
    )?;

    verify_signature(
        client_state.public_key(),
        &sign_bytes,
        &signature_and_data.signature,
    )
}

/// Splits a payload into the path it is about and its timestamp-free content.
fn fact(data_type: DataType, data: &[u8]) -> Result<(Vec<u8>, Vec<u8>), SoloMachineClientError> {
    match data_type {
        DataType::ClientState => fact_of::<ClientStateData>(data),
        DataType::ConsensusState => fact_of::<ConsensusStateData>(data),
        DataType::ConnectionState => fact_of::<ConnectionStateData>(data),
        DataType::ChannelState => fact_of::<ChannelStateData>(data),
        DataType::PacketCommitment => fact_of::<PacketCommitmentData>(data),
        DataType::PacketAcknowledgement => fact_of::<PacketAcknowledgementData>(data),
        DataType::PacketAcknowledgementAbsence => fact_of::<PacketAcknowledgementAbsenceData>(data),
        DataType::NextSequenceRecv => fact_of::<NextSequenceRecvData>(data),
        DataType::Header => fact_of::<HeaderData>(data),
        DataType::Unspecified => Err(SoloMachineClientError::invalid_input(
            "misbehaviour data type is unspecified",
        )),
    }
}

fn fact_of<D: SignData>(data: &[u8]) -> Result<(Vec<u8>, Vec<u8>), SoloMachineClientError> {
    let mut payload = D::decode(data)?;
    let path = payload.path().to_vec();
    payload.clear_timestamp();
    Ok((path, encode(&payload)?))
}

impl From<SignatureAndData> for RawSignatureAndData {
    fn from(value: SignatureAndData) -> Self {
        Self {
            signature: value.signature,
            data_type: value.data_type.into(),
            data: value.data,
        }
    }
}

impl TryFrom<RawSignatureAndData> for SignatureAndData {
    type Error = SoloMachineClientError;

    fn try_from(raw: RawSignatureAndData) -> Result<Self, Self::Error> {
        let data_type = DataType::try_from(raw.data_type).map_err(|_| {
            SoloMachineClientError::invalid_input(format!("unknown data type {}", raw.data_type))
        })?;
        ensure!(
            data_type != DataType::Unspecified,
            SoloMachineClientError::invalid_input("data type cannot be unspecified")
        );
        ensure!(
            !raw.signature.is_empty(),
            SoloMachineClientError::invalid_input("signature cannot be empty")
        );

        Ok(Self {
            signature: raw.signature,
            data_type,
            data: raw.data,
        })
    }
}

impl From<Misbehaviour> for RawMisbehaviour {
    fn from(value: Misbehaviour) -> Self {
        Self {
            sequence: value.sequence,
            signature_one: Some(value.signature_one.into()),
            signature_two: Some(value.signature_two.into()),
        }
    }
}

impl TryFrom<RawMisbehaviour> for Misbehaviour {
    type Error = SoloMachineClientError;

    fn try_from(raw: RawMisbehaviour) -> Result<Self, Self::Error> {
        let missing = || SoloMachineClientError::invalid_input("misbehaviour is missing a signature");
        Ok(Self {
            sequence: raw.sequence,
            signature_one: raw.signature_one.ok_or_else(missing)?.try_into()?,
            signature_two: raw.signature_two.ok_or_else(missing)?.try_into()?,
        })
    }
}

#[cfg(test)]
mod check_misbehaviour {
    use super::*;
    use crate::{path::MerklePath, sign_bytes::ProvableValue, test_utils::SoloMachine};

    fn path(p: &str) -> MerklePath {
        MerklePath::new(["ibc", p]).unwrap()
    }

    #[test]
    fn conflicting_commitments_are_misbehaviour() {
        let machine = SoloMachine::ed25519(1, "testing");
        let cs = machine.client_state(3, 100);
        let misbehaviour = Misbehaviour {
            sequence: 3,
            signature_one: machine.signature_and_data(
                3,
                100,
                &path("commitments/1"),
                &ProvableValue::PacketCommitment(vec![0xab, 0xcd]),
            ),
            signature_two: machine.signature_and_data(
                3,
                100,
                &path("commitments/1"),
                &ProvableValue::PacketCommitment(vec![0xde, 0xad]),
            ),
        };

        assert_eq!(check_misbehaviour(&cs, &misbehaviour), Ok(true));
    }

    #[test]
    fn facts_about_different_paths_are_not_misbehaviour() {
        let machine = SoloMachine::ed25519(1, "testing");
        let cs = machine.client_state(3, 100);
        let misbehaviour = Misbehaviour {
            sequence: 3,
            signature_one: machine.signature_and_data(
                3,
                100,
                &path("commitments/1"),
                &ProvableValue::PacketCommitment(vec![0xab]),
            ),
            signature_two: machine.signature_and_data(
                3,
                100,
                &path("commitments/2"),
                &ProvableValue::PacketCommitment(vec![0xcd]),
            ),
        };

        assert_eq!(check_misbehaviour(&cs, &misbehaviour), Ok(false));
    }

    #[test]
    fn same_fact_resigned_later_is_not_misbehaviour() {
        let machine = SoloMachine::secp256k1(1, "testing");
        let cs = machine.client_state(3, 100);
        let value = ProvableValue::NextSequenceRecv(4);
        let misbehaviour = Misbehaviour {
            sequence: 3,
            signature_one: machine.signature_and_data(3, 100, &path("nextSequenceRecv"), &value),
            signature_two: machine.signature_and_data(3, 150, &path("nextSequenceRecv"), &value),
        };

        assert_eq!(check_misbehaviour(&cs, &misbehaviour), Ok(false));
    }

    #[test]
    fn different_kinds_are_not_misbehaviour() {
        let machine = SoloMachine::ed25519(1, "testing");
        let cs = machine.client_state(3, 100);
        let misbehaviour = Misbehaviour {
            sequence: 3,
            signature_one: machine.signature_and_data(
                3,
                100,
                &path("acks/1"),
                &ProvableValue::PacketAcknowledgement(vec![1]),
            ),
            signature_two: machine.signature_and_data(
                3,
                100,
                &path("acks/1"),
                &ProvableValue::PacketAcknowledgementAbsence,
            ),
        };

        assert_eq!(check_misbehaviour(&cs, &misbehaviour), Ok(false));
    }

    #[test]
    fn conflicting_headers_are_misbehaviour() {
        let machine = SoloMachine::ed25519(1, "testing");
        let cs = machine.client_state(3, 100);
        let to_a = machine.create_header(3, 200, &SoloMachine::ed25519(2, "a"));
        let to_b = machine.create_header(3, 200, &SoloMachine::ed25519(3, "b"));

        let misbehaviour = Misbehaviour {
            sequence: 3,
            signature_one: machine.header_signature_and_data(&to_a),
            signature_two: machine.header_signature_and_data(&to_b),
        };

        assert_eq!(check_misbehaviour(&cs, &misbehaviour), Ok(true));
    }

    #[test]
    fn fails_on_signature_by_untrusted_key() {
        let machine = SoloMachine::ed25519(1, "testing");
        let rogue = SoloMachine::ed25519(9, "testing");
        let cs = machine.client_state(3, 100);
        let misbehaviour = Misbehaviour {
            sequence: 3,
            signature_one: machine.signature_and_data(
                3,
                100,
                &path("commitments/1"),
                &ProvableValue::PacketCommitment(vec![1]),
            ),
            signature_two: rogue.signature_and_data(
                3,
                100,
                &path("commitments/1"),
                &ProvableValue::PacketCommitment(vec![2]),
            ),
        };

        assert_eq!(
            check_misbehaviour(&cs, &misbehaviour),
            Err(SoloMachineClientError::SignatureVerificationFailed)
        );
    }

    #[test]
    fn fails_when_sequence_does_not_match_signatures() {
        let machine = SoloMachine::ed25519(1, "testing");
        let cs = machine.client_state(3, 100);
        let misbehaviour = Misbehaviour {
            sequence: 4,
            signature_one: machine.signature_and_data(
                3,
                100,
                &path("commitments/1"),
                &ProvableValue::PacketCommitment(vec![1]),
            ),
            signature_two: machine.signature_and_data(
                3,
                100,
                &path("commitments/1"),
                &ProvableValue::PacketCommitment(vec![2]),
            ),
        };

        assert_eq!(
            check_misbehaviour(&cs, &misbehaviour),
            Err(SoloMachineClientError::SignatureVerificationFailed)
        );
    }

    #[test]
    fn fails_on_frozen() {
        let machine = SoloMachine::ed25519(1, "testing");
        let cs = update_state_on_misbehaviour(&machine.client_state(3, 100));
        let sig = machine.signature_and_data(
            3,
            100,
            &path("commitments/1"),
            &ProvableValue::PacketCommitment(vec![1]),
        );
        let misbehaviour = Misbehaviour {
            sequence: 3,
            signature_one: sig.clone(),
            signature_two: sig,
        };

        assert_eq!(
            check_misbehaviour(&cs, &misbehaviour),
            Err(SoloMachineClientError::ClientFrozen)
        );
    }

    #[test]
    fn freezing_changes_only_the_frozen_flag() {
        let cs = SoloMachine::ed25519(1, "testing").client_state(3, 100);
        let frozen = update_state_on_misbehaviour(&cs);
        assert!(frozen.is_frozen);
        assert_eq!(frozen.sequence, cs.sequence);
        assert_eq!(frozen.consensus_state, cs.consensus_state);
    }

    #[test]
    fn raw_conversion_rejects_unspecified_data_type() {
        let machine = SoloMachine::ed25519(1, "testing");
        let sig = machine.signature_and_data(
            3,
            100,
            &path("commitments/1"),
            &ProvableValue::PacketCommitment(vec![1]),
        );
        let misbehaviour = Misbehaviour {
            sequence: 3,
            signature_one: sig.clone(),
            signature_two: sig,
        };

        let mut raw = RawMisbehaviour::from(misbehaviour.clone());
        assert_eq!(Misbehaviour::try_from(raw.clone()).unwrap(), misbehaviour);

        if let Some(one) = raw.signature_one.as_mut() {
            one.data_type = DataType::Unspecified.into();
        }
        assert!(matches!(
            Misbehaviour::try_from(raw),
            Err(SoloMachineClientError::InvalidInput { .. })
        ));
    }
}
