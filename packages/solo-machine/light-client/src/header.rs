//! Solo machine header types for key rotation

use ibc_proto::google::protobuf::Any;
use prost::Message;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::{
    consensus_state::validate_diversifier,
    ensure,
    error::SoloMachineClientError,
    public_key::PublicKey,
    types::{solomachine::Header as RawHeader, SOLO_MACHINE_HEADER_TYPE_URL},
};

/// Rotation instruction: replace the trusted key and diversifier.
///
/// Must be signed by the key trusted before it is applied, at the client's current sequence.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Sequence the header is signed at
    pub sequence: u64,
    /// Timestamp the new consensus state takes
    pub timestamp: u64,
    /// Signature by the currently trusted key over the header sign bytes
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
    /// Key to trust from the next sequence on
    pub new_public_key: PublicKey,
    /// Diversifier to use from the next sequence on
    pub new_diversifier: String,
}

impl Header {
    /// Stateless checks on the header.
    ///
    /// # Errors
    /// Returns [`SoloMachineClientError::InvalidHeader`] if the timestamp is zero, the
    /// signature is empty or the new diversifier is only whitespace.
    pub fn validate_basic(&self) -> Result<(), SoloMachineClientError> {
        ensure!(
            self.timestamp != 0,
            SoloMachineClientError::invalid_header("timestamp cannot be zero")
        );
        ensure!(
            !self.signature.is_empty(),
            SoloMachineClientError::invalid_header("signature cannot be empty")
        );
        validate_diversifier(&self.new_diversifier).map_err(|_| {
            SoloMachineClientError::invalid_header("new diversifier cannot contain only spaces")
        })
    }

    /// Pack the header as a protobuf `Any`, the form relayers submit it in.
    #[must_use]
    pub fn to_any(&self) -> Any {
        Any {
            type_url: SOLO_MACHINE_HEADER_TYPE_URL.to_string(),
            value: RawHeader::from(self.clone()).encode_to_vec(),
        }
    }
}

impl From<Header> for RawHeader {
    fn from(value: Header) -> Self {
        Self {
            sequence: value.sequence,
            timestamp: value.timestamp,
            signature: value.signature,
            new_public_key: Some(value.new_public_key.to_any()),
            new_diversifier: value.new_diversifier,
        }
    }
}

impl TryFrom<RawHeader> for Header {
    type Error = SoloMachineClientError;

    fn try_from(raw: RawHeader) -> Result<Self, Self::Error> {
        let new_public_key = raw
            .new_public_key
            .as_ref()
            .ok_or_else(|| SoloMachineClientError::invalid_header("missing new public key"))?;

        let header = Self {
            sequence: raw.sequence,
            timestamp: raw.timestamp,
            signature: raw.signature,
            new_public_key: PublicKey::try_from(new_public_key)?,
            new_diversifier: raw.new_diversifier,
        };
        header.validate_basic()?;

        Ok(header)
    }
}

impl TryFrom<&Any> for Header {
    type Error = SoloMachineClientError;

    fn try_from(any: &Any) -> Result<Self, Self::Error> {
        ensure!(
            any.type_url == SOLO_MACHINE_HEADER_TYPE_URL,
            SoloMachineClientError::invalid_header(format!(
                "expected type {SOLO_MACHINE_HEADER_TYPE_URL}, got {}",
                any.type_url
            ))
        );
        RawHeader::decode(any.value.as_slice())?.try_into()
    }
}
