//! Test utilities for the solo machine light client

#[cfg(any(test, feature = "test-utils"))]
pub use fixtures::*;

#[allow(missing_docs, clippy::missing_panics_doc)]
#[cfg(any(test, feature = "test-utils"))]
mod fixtures {
    use ed25519_dalek::Signer as _;
    use ibc_proto::ibc::core::{
        channel::v1::{Channel, Counterparty as ChannelCounterparty},
        commitment::v1::MerklePrefix,
        connection::v1::{ConnectionEnd, Counterparty as ConnectionCounterparty, Version},
    };

    use crate::{
        client_state::ClientState,
        consensus_state::ConsensusState,
        header::Header,
        misbehaviour::SignatureAndData,
        path::MerklePath,
        public_key::{PublicKey, SignatureScheme},
        sign_bytes::{self, ProvableValue},
        types::DataType,
    };

    #[derive(Clone, Debug)]
    enum Key {
        Ed25519(ed25519_dalek::SigningKey),
        Secp256k1(k256::ecdsa::SigningKey),
    }

    /// A solo machine: a signing key and the diversifier it signs under.
    #[derive(Clone, Debug)]
    pub struct SoloMachine {
        key: Key,
        pub diversifier: String,
    }

    impl SoloMachine {
        #[must_use]
        pub fn ed25519(seed: u8, diversifier: &str) -> Self {
            Self {
                key: Key::Ed25519(ed25519_dalek::SigningKey::from_bytes(&[seed; 32])),
                diversifier: diversifier.to_string(),
            }
        }

        #[must_use]
        pub fn secp256k1(seed: u8, diversifier: &str) -> Self {
            Self {
                key: Key::Secp256k1(
                    k256::ecdsa::SigningKey::from_slice(&[seed; 32]).expect("valid key"),
                ),
                diversifier: diversifier.to_string(),
            }
        }

        #[must_use]
        pub fn public_key(&self) -> PublicKey {
            match &self.key {
                Key::Ed25519(key) => PublicKey::new(
                    SignatureScheme::Ed25519,
                    key.verifying_key().to_bytes().to_vec(),
                ),
                Key::Secp256k1(key) => PublicKey::new(
                    SignatureScheme::Secp256k1,
                    key.verifying_key().to_sec1_bytes().to_vec(),
                ),
            }
            .expect("valid public key")
        }

        #[must_use]
        pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
            match &self.key {
                Key::Ed25519(key) => key.sign(msg).to_bytes().to_vec(),
                Key::Secp256k1(key) => {
                    let signature: k256::ecdsa::Signature = key.sign(msg);
                    signature.to_bytes().to_vec()
                }
            }
        }

        #[must_use]
        pub fn consensus_state(&self, timestamp: u64) -> ConsensusState {
            ConsensusState {
                public_key: self.public_key(),
                diversifier: self.diversifier.clone(),
                timestamp,
            }
        }

        #[must_use]
        pub fn client_state(&self, sequence: u64, timestamp: u64) -> ClientState {
            ClientState::new(sequence, self.consensus_state(timestamp))
        }

        /// Header rotating from `self` to `next`, signed by `self`.
        #[must_use]
        pub fn create_header(&self, sequence: u64, timestamp: u64, next: &Self) -> Header {
            let mut header = Header {
                sequence,
                timestamp,
                signature: vec![],
                new_public_key: next.public_key(),
                new_diversifier: next.diversifier.clone(),
            };
            let sign_bytes = sign_bytes::header_sign_bytes(&self.diversifier, &header).unwrap();
            header.signature = self.sign(&sign_bytes);
            header
        }

        #[must_use]
        pub fn sign_proof(
            &self,
            sequence: u64,
            timestamp: u64,
            path: &MerklePath,
            value: &ProvableValue,
        ) -> Vec<u8> {
            let sign_bytes =
                sign_bytes::proof_sign_bytes(sequence, timestamp, &self.diversifier, path, value)
                    .unwrap();
            self.sign(&sign_bytes)
        }

        #[must_use]
        pub fn signature_and_data(
            &self,
            sequence: u64,
            timestamp: u64,
            path: &MerklePath,
            value: &ProvableValue,
        ) -> SignatureAndData {
            let data = value.data_bytes(timestamp, path).unwrap();
            self.sign_envelope(sequence, value.data_type(), data)
        }

        #[must_use]
        pub fn header_signature_and_data(&self, header: &Header) -> SignatureAndData {
            let data = sign_bytes::header_data_bytes(header).unwrap();
            self.sign_envelope(header.sequence, DataType::Header, data)
        }

        fn sign_envelope(&self, sequence: u64, data_type: DataType, data: Vec<u8>) -> SignatureAndData {
            let sign_bytes =
                sign_bytes::envelope(sequence, &self.diversifier, data_type, data.clone()).unwrap();
            SignatureAndData {
                signature: self.sign(&sign_bytes),
                data_type,
                data,
            }
        }
    }

    #[must_use]
    pub fn sample_connection() -> ConnectionEnd {
        ConnectionEnd {
            client_id: "06-solomachine-0".to_string(),
            versions: vec![Version {
                identifier: "1".to_string(),
                features: vec!["ORDER_ORDERED".to_string(), "ORDER_UNORDERED".to_string()],
            }],
            state: 3,
            counterparty: Some(ConnectionCounterparty {
                client_id: "07-tendermint-0".to_string(),
                connection_id: "connection-0".to_string(),
                prefix: Some(MerklePrefix {
                    key_prefix: b"ibc".to_vec(),
                }),
            }),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn sample_channel() -> Channel {
        Channel {
            state: 3,
            ordering: 1,
            counterparty: Some(ChannelCounterparty {
                port_id: "transfer".to_string(),
                channel_id: "channel-0".to_string(),
            }),
            connection_hops: vec!["connection-0".to_string()],
            version: "ics20-1".to_string(),
            ..Default::default()
        }
    }
}
