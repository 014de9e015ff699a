//! Solo machine verification logic: the replay guard in front of every signature check

use tracing::{debug, warn};

use crate::{
    client_state::ClientState,
    config::ClientConfig,
    ensure,
    error::SoloMachineClientError,
    header::Header,
    path::MerklePath,
    sign_bytes::{self, ProvableValue},
    signature::verify_signature,
};

/// Checks a proof against the client's trust context and builds the bytes it must sign.
///
/// This never mutates the client: a fact can be verified any number of times at the same
/// sequence until a header moves the client forward.
///
/// # Errors
/// Returns an error if:
/// - The client is frozen
/// - `sequence` is not the client's current sequence
/// - `timestamp` is behind the trusted consensus timestamp under the configured policy
/// - The value cannot be encoded for its proof kind
pub fn check_and_build(
    config: &ClientConfig,
    client_state: &ClientState,
    value: &ProvableValue,
    path: &MerklePath,
    sequence: u64,
    timestamp: u64,
) -> Result<Vec<u8>, SoloMachineClientError> {
    ensure!(!client_state.is_frozen, SoloMachineClientError::ClientFrozen);
    ensure!(
        sequence == client_state.sequence,
        SoloMachineClientError::SequenceMismatch {
            expected: client_state.sequence,
            actual: sequence,
        }
    );
    check_timestamp(config, client_state, timestamp)?;

    sign_bytes::proof_sign_bytes(
        sequence,
        timestamp,
        &client_state.consensus_state.diversifier,
        path,
        value,
    )
}

/// Verifies a signed proof of `value` at `path` against the currently trusted key.
///
/// # Errors
/// See [`check_and_build`]; additionally returns
/// [`SoloMachineClientError::SignatureVerificationFailed`] if the signature does not match.
pub fn verify_proof(
    config: &ClientConfig,
    client_state: &ClientState,
    sequence: u64,
    timestamp: u64,
    path: &MerklePath,
    proof: &[u8],
    value: &ProvableValue,
) -> Result<(), SoloMachineClientError> {
    let data_type = value.data_type();
    let sign_bytes = check_and_build(config, client_state, value, path, sequence, timestamp)
        .inspect_err(|err| match err {
            SoloMachineClientError::ClientFrozen => {
                warn!(?data_type, %path, "proof submitted to frozen client");
            }
            _ => debug!(?data_type, %path, %err, "proof rejected before signature check"),
        })?;

    verify_signature(client_state.public_key(), &sign_bytes, proof)
        .inspect_err(|_| debug!(?data_type, %path, sequence, "proof signature rejected"))?;

    debug!(?data_type, %path, sequence, "proof verified");
    Ok(())
}

/// Verifies that a header may rotate the client's key.
///
/// The header must be signed by the key trusted *before* the rotation, over the header sign
/// bytes at the client's current sequence and diversifier.
///
/// # Errors
/// Returns an error if:
/// - The client is frozen
/// - The header fails its stateless checks
/// - The header sequence is not the client's sequence
/// - The header timestamp is behind the trusted consensus timestamp
/// - The signature does not verify under the current key
pub fn verify_header(
    config: &ClientConfig,
    client_state: &ClientState,
    header: &Header,
) -> Result<(), SoloMachineClientError> {
    if client_state.is_frozen {
        warn!(sequence = header.sequence, "header submitted to frozen client");
        return Err(SoloMachineClientError::ClientFrozen);
    }
    header.validate_basic()?;
    ensure!(
        header.sequence == client_state.sequence,
        SoloMachineClientError::SequenceMismatch {
            expected: client_state.sequence,
            actual: header.sequence,
        }
    );
    check_timestamp(config, client_state, header.timestamp)?;

    let sign_bytes =
        sign_bytes::header_sign_bytes(&client_state.consensus_state.diversifier, header)?;

    verify_signature(client_state.public_key(), &sign_bytes, &header.signature)
}

fn check_timestamp(
    config: &ClientConfig,
    client_state: &ClientState,
    timestamp: u64,
) -> Result<(), SoloMachineClientError> {
    let trusted = client_state.latest_timestamp();
    ensure!(
        config.timestamp_policy.accepts(timestamp, trusted),
        SoloMachineClientError::TimestampNotIncreasing { timestamp, trusted }
    );
    Ok(())
}


#[cfg(test)]
mod verify_header {
    use super::*;
    use crate::test_utils::SoloMachine;

    #[test]
    fn succeeds_with_current_key() {
        let current = SoloMachine::ed25519(1, "testing");
        let cs = current.client_state(3, 100);
        let header = current.create_header(3, 200, &SoloMachine::ed25519(2, "rotated"));

        assert!(verify_header(&ClientConfig::default(), &cs, &header).is_ok());
    }

    #[test]
    fn fails_on_frozen() {
        let current = SoloMachine::ed25519(1, "testing");
        let mut cs = current.client_state(3, 100);
        cs.is_frozen = true;
        let header = current.create_header(3, 200, &SoloMachine::ed25519(2, "rotated"));

        let res = verify_header(&ClientConfig::default(), &cs, &header);
        assert_eq!(res, Err(SoloMachineClientError::ClientFrozen));
    }

    #[test]
    fn fails_when_signed_by_new_key() {
        let current = SoloMachine::ed25519(1, "testing");
        let next = SoloMachine::ed25519(2, "rotated");
        let cs = current.client_state(3, 100);
        let self_signed = next.create_header(3, 200, &next);

        let res = verify_header(&ClientConfig::default(), &cs, &self_signed);
        assert_eq!(res, Err(SoloMachineClientError::SignatureVerificationFailed));
    }

    #[test]
    fn fails_on_wrong_sequence() {
        let current = SoloMachine::secp256k1(1, "testing");
        let cs = current.client_state(3, 100);
        let header = current.create_header(2, 200, &SoloMachine::secp256k1(2, "rotated"));

        let res = verify_header(&ClientConfig::default(), &cs, &header);
        assert!(matches!(
            res,
            Err(SoloMachineClientError::SequenceMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn fails_on_timestamp_going_back() {
        let current = SoloMachine::secp256k1(1, "testing");
        let cs = current.client_state(3, 100);
        let header = current.create_header(3, 50, &SoloMachine::secp256k1(2, "rotated"));

        let res = verify_header(&ClientConfig::default(), &cs, &header);
        assert!(matches!(
            res,
            Err(SoloMachineClientError::TimestampNotIncreasing { .. })
        ));
    }

    #[test]
    fn fails_when_diversifier_differs_from_trusted() {
        let signer = SoloMachine::ed25519(1, "other-domain");
        let cs = SoloMachine::ed25519(1, "testing").client_state(3, 100);
        let header = signer.create_header(3, 200, &SoloMachine::ed25519(2, "rotated"));

        let res = verify_header(&ClientConfig::default(), &cs, &header);
        assert_eq!(res, Err(SoloMachineClientError::SignatureVerificationFailed));
    }
}
