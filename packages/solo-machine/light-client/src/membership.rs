//! Membership proof verification for the solo machine client
//!
//! Every function takes the proof sequence and timestamp, the commitment path, the raw
//! signature (`proof`) and the value the solo machine is claimed to have signed. None of them
//! mutate the client state.

use ibc_proto::{
    google::protobuf::Any,
    ibc::core::{channel::v1::Channel, connection::v1::ConnectionEnd},
};

use prost::Message;

use crate::{
    client_state::ClientState,
    config::ClientConfig,
    error::SoloMachineClientError,
    path::MerklePath,
    sign_bytes::ProvableValue,
    types::{CHANNEL_TYPE_URL, CONNECTION_END_TYPE_URL},
    verify::verify_proof,
};

/// Verify a proof of a counterparty client state, given in its packed form.
///
/// # Errors
/// Returns an error if the proof does not verify; see [`verify_proof`].
pub fn verify_client_state(
    config: &ClientConfig,
    client_state: &ClientState,
    sequence: u64,
    timestamp: u64,
    path: &MerklePath,
    proof: &[u8],
    counterparty_client_state: &Any,
) -> Result<(), SoloMachineClientError> {
    let value = ProvableValue::ClientState(counterparty_client_state.clone());
    verify_proof(config, client_state, sequence, timestamp, path, proof, &value)
}

/// Verify a proof of a counterparty consensus state, given in its packed form.
///
/// # Errors
/// Returns an error if the proof does not verify; see [`verify_proof`].
pub fn verify_consensus_state(
    config: &ClientConfig,
    client_state: &ClientState,
    sequence: u64,
    timestamp: u64,
    path: &MerklePath,
    proof: &[u8],
    consensus_state: &Any,
) -> Result<(), SoloMachineClientError> {
    let value = ProvableValue::ConsensusState(consensus_state.clone());
    verify_proof(config, client_state, sequence, timestamp, path, proof, &value)
}

/// Verify a proof of a connection end.
///
/// The connection arrives packed from the connection module and must unpack to a
/// `ConnectionEnd`, otherwise the call fails with an invalid input error.
///
/// # Errors
/// Returns an error if the value is not a connection end or the proof does not verify.
pub fn verify_connection_state(
    config: &ClientConfig,
    client_state: &ClientState,
    sequence: u64,
    timestamp: u64,
    path: &MerklePath,
    proof: &[u8],
    connection: &Any,
) -> Result<(), SoloMachineClientError> {
    let value = ProvableValue::ConnectionState(connection.clone());
    verify_proof(config, client_state, sequence, timestamp, path, proof, &value)
}

/// Verify a proof of a channel end.
///
/// # Errors
/// Returns an error if the value is not a channel or the proof does not verify.
pub fn verify_channel_state(
    config: &ClientConfig,
    client_state: &ClientState,
    sequence: u64,
    timestamp: u64,
    path: &MerklePath,
    proof: &[u8],
    channel: &Any,
) -> Result<(), SoloMachineClientError> {
    let value = ProvableValue::ChannelState(channel.clone());
    verify_proof(config, client_state, sequence, timestamp, path, proof, &value)
}

/// Verify a proof of a packet commitment.
///
/// # Errors
/// Returns an error if the proof does not verify; see [`verify_proof`].
pub fn verify_packet_commitment(
    config: &ClientConfig,
    client_state: &ClientState,
    sequence: u64,
    timestamp: u64,
    path: &MerklePath,
    proof: &[u8],
    commitment: &[u8],
) -> Result<(), SoloMachineClientError> {
    let value = ProvableValue::PacketCommitment(commitment.to_vec());
    verify_proof(config, client_state, sequence, timestamp, path, proof, &value)
}

/// Verify a proof of a packet acknowledgement.
///
/// # Errors
/// Returns an error if the proof does not verify; see [`verify_proof`].
pub fn verify_packet_acknowledgement(
    config: &ClientConfig,
    client_state: &ClientState,
    sequence: u64,
    timestamp: u64,
    path: &MerklePath,
    proof: &[u8],
    acknowledgement: &[u8],
) -> Result<(), SoloMachineClientError> {
    let value = ProvableValue::PacketAcknowledgement(acknowledgement.to_vec());
    verify_proof(config, client_state, sequence, timestamp, path, proof, &value)
}

/// Verify a proof that no acknowledgement exists at `path`.
///
/// # Errors
/// Returns an error if the proof does not verify; see [`verify_proof`].
pub fn verify_packet_acknowledgement_absence(
    config: &ClientConfig,
    client_state: &ClientState,
    sequence: u64,
    timestamp: u64,
    path: &MerklePath,
    proof: &[u8],
) -> Result<(), SoloMachineClientError> {
    let value = ProvableValue::PacketAcknowledgementAbsence;
    verify_proof(config, client_state, sequence, timestamp, path, proof, &value)
}

/// Verify a proof of the next sequence to be received on a channel.
///
/// # Errors
/// Returns an error if the proof does not verify; see [`verify_proof`].
pub fn verify_next_sequence_recv(
    config: &ClientConfig,
    client_state: &ClientState,
    sequence: u64,
    timestamp: u64,
    path: &MerklePath,
    proof: &[u8],
    next_sequence_recv: u64,
) -> Result<(), SoloMachineClientError> {
    let value = ProvableValue::NextSequenceRecv(next_sequence_recv);
    verify_proof(config, client_state, sequence, timestamp, path, proof, &value)
}

/// Pack a connection end the way the connection module hands it over.
#[must_use]
pub fn pack_connection(connection: &ConnectionEnd) -> Any {
    Any {
        type_url: CONNECTION_END_TYPE_URL.to_string(),
        value: connection.encode_to_vec(),
    }
}

/// Pack a channel end the way the channel module hands it over.
#[must_use]
pub fn pack_channel(channel: &Channel) -> Any {
    Any {
        type_url: CHANNEL_TYPE_URL.to_string(),
        value: channel.encode_to_vec(),
    }
}

#[cfg(test)]
mod verify_membership {
    use rstest::rstest;

    use super::*;
    use crate::{
        error::ErrorKind,
        test_utils::{sample_channel, sample_connection, SoloMachine},
    };

    const SEQUENCE: u64 = 3;
    const TIMESTAMP: u64 = 100;

    fn setup() -> (SoloMachine, ClientState, MerklePath) {
        let machine = SoloMachine::ed25519(1, "testing");
        let cs = machine.client_state(SEQUENCE, TIMESTAMP);
        let path = MerklePath::new(["ibc", "commitments/1"]).unwrap();
        (machine, cs, path)
    }

    /// Runs the exposed verification function matching the value's kind.
    fn run(
        cs: &ClientState,
        path: &MerklePath,
        proof: &[u8],
        value: &ProvableValue,
    ) -> Result<(), SoloMachineClientError> {
        let config = ClientConfig::default();
        match value {
            ProvableValue::ClientState(v) => {
                verify_client_state(&config, cs, SEQUENCE, TIMESTAMP, path, proof, v)
            }
            ProvableValue::ConsensusState(v) => {
                verify_consensus_state(&config, cs, SEQUENCE, TIMESTAMP, path, proof, v)
            }
            ProvableValue::ConnectionState(v) => {
                verify_connection_state(&config, cs, SEQUENCE, TIMESTAMP, path, proof, v)
            }
            ProvableValue::ChannelState(v) => {
                verify_channel_state(&config, cs, SEQUENCE, TIMESTAMP, path, proof, v)
            }
            ProvableValue::PacketCommitment(v) => {
                verify_packet_commitment(&config, cs, SEQUENCE, TIMESTAMP, path, proof, v)
            }
            ProvableValue::PacketAcknowledgement(v) => {
                verify_packet_acknowledgement(&config, cs, SEQUENCE, TIMESTAMP, path, proof, v)
            }
            ProvableValue::PacketAcknowledgementAbsence => {
                verify_packet_acknowledgement_absence(&config, cs, SEQUENCE, TIMESTAMP, path, proof)
            }
            ProvableValue::NextSequenceRecv(v) => {
                verify_next_sequence_recv(&config, cs, SEQUENCE, TIMESTAMP, path, proof, *v)
            }
        }
    }

    fn value(kind: &str) -> ProvableValue {
        let other = SoloMachine::secp256k1(5, "counterparty");
        match kind {
            "client_state" => ProvableValue::ClientState(other.client_state(1, 10).to_any()),
            "consensus_state" => ProvableValue::ConsensusState(other.consensus_state(10).to_any()),
            "connection" => ProvableValue::ConnectionState(pack_connection(&sample_connection())),
            "channel" => ProvableValue::ChannelState(pack_channel(&sample_channel())),
            "commitment" => ProvableValue::PacketCommitment(vec![0xab, 0xcd]),
            "ack" => ProvableValue::PacketAcknowledgement(vec![0x01]),
            "ack_absence" => ProvableValue::PacketAcknowledgementAbsence,
            "next_seq_recv" => ProvableValue::NextSequenceRecv(9),
            unknown => panic!("unknown kind {unknown}"),
        }
    }

    #[rstest]
    fn succeeds(
        #[values(
            "client_state",
            "consensus_state",
            "connection",
            "channel",
            "commitment",
            "ack",
            "ack_absence",
            "next_seq_recv"
        )]
        kind: &str,
    ) {
        let (machine, cs, path) = setup();
        let value = value(kind);
        let proof = machine.sign_proof(SEQUENCE, TIMESTAMP, &path, &value);

        assert_eq!(run(&cs, &path, &proof, &value), Ok(()));
    }

    #[rstest]
    fn fails_on_any_flipped_byte(
        #[values("client_state", "connection", "commitment", "ack_absence", "next_seq_recv")]
        kind: &str,
    ) {
        let (machine, cs, path) = setup();
        let value = value(kind);
        let sign_bytes = crate::sign_bytes::proof_sign_bytes(
            SEQUENCE,
            TIMESTAMP,
            &cs.consensus_state.diversifier,
            &path,
            &value,
        )
        .unwrap();
        let signature = machine.sign(&sign_bytes);

        for i in 0..sign_bytes.len() {
            let mut tampered = sign_bytes.clone();
            tampered[i] ^= 0x01;
            assert_eq!(
                crate::signature::verify_signature(cs.public_key(), &tampered, &signature),
                Err(SoloMachineClientError::SignatureVerificationFailed),
                "byte {i} of {kind}"
            );
        }
    }

    #[rstest]
    fn fails_when_proof_is_for_another_value(
        #[values("commitment", "ack", "next_seq_recv", "connection")] kind: &str,
    ) {
        let (machine, cs, path) = setup();
        let signed = value(kind);
        let claimed = match signed {
            ProvableValue::PacketCommitment(_) => ProvableValue::PacketCommitment(vec![0xff]),
            ProvableValue::PacketAcknowledgement(_) => {
                ProvableValue::PacketAcknowledgement(vec![0xff])
            }
            ProvableValue::NextSequenceRecv(n) => ProvableValue::NextSequenceRecv(n + 1),
            _ => {
                let mut connection = sample_connection();
                connection.client_id = "07-tendermint-99".to_string();
                ProvableValue::ConnectionState(pack_connection(&connection))
            }
        };
        let proof = machine.sign_proof(SEQUENCE, TIMESTAMP, &path, &signed);

        let err = run(&cs, &path, &proof, &claimed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VerificationFailure);
    }

    #[test]
    fn fails_when_proof_is_for_another_path() {
        let (machine, cs, path) = setup();
        let value = value("commitment");
        let proof = machine.sign_proof(SEQUENCE, TIMESTAMP, &path, &value);
        let other_path = MerklePath::new(["ibc", "commitments/2"]).unwrap();

        assert_eq!(
            run(&cs, &other_path, &proof, &value),
            Err(SoloMachineClientError::SignatureVerificationFailed)
        );
    }

    #[test]
    fn commitment_proof_does_not_verify_as_acknowledgement() {
        let (machine, cs, path) = setup();
        let commitment = ProvableValue::PacketCommitment(vec![0x01]);
        let proof = machine.sign_proof(SEQUENCE, TIMESTAMP, &path, &commitment);

        assert_eq!(
            run(&cs, &path, &proof, &ProvableValue::PacketAcknowledgement(vec![0x01])),
            Err(SoloMachineClientError::SignatureVerificationFailed)
        );
    }

    #[test]
    fn wrong_value_shape_is_invalid_input_not_verification_failure() {
        let (machine, cs, path) = setup();
        let channel_any = pack_channel(&sample_channel());
        let proof = machine.sign(b"irrelevant");

        let err = verify_connection_state(
            &ClientConfig::default(),
            &cs,
            SEQUENCE,
            TIMESTAMP,
            &path,
            &proof,
            &channel_any,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn verification_is_repeatable_and_does_not_advance_sequence() {
        let (machine, cs, path) = setup();
        let value = value("ack");
        let proof = machine.sign_proof(SEQUENCE, TIMESTAMP, &path, &value);
        let before = cs.clone();

        for _ in 0..3 {
            assert_eq!(run(&cs, &path, &proof, &value), Ok(()));
        }
        assert_eq!(cs, before);
    }
}
