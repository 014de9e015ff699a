//! Canonical sign bytes for every fact a solo machine can attest to.
//!
//! A proof signs `SignBytes { sequence, diversifier, data_type, data }` where `data` is the
//! kind-specific payload `{ timestamp, path, value }`. Paths are always signed in their
//! canonical string form.

use ibc_proto::{
    google::protobuf::Any,
    ibc::core::{channel::v1::Channel, connection::v1::ConnectionEnd},
};
use prost::Message;

use crate::{
    ensure,
    error::SoloMachineClientError,
    header::Header,
    membership::{pack_channel, pack_connection},
    path::MerklePath,
    types::{
        ChannelStateData, ClientStateData, ConnectionStateData, ConsensusStateData, DataType,
        HeaderData, NextSequenceRecvData, PacketAcknowledgementAbsenceData,
        PacketAcknowledgementData, PacketCommitmentData, SignBytes, CHANNEL_TYPE_URL,
        CONNECTION_END_TYPE_URL,
    },
};

/// The value a proof attests to, one variant per proof kind.
///
/// Client, consensus, connection and channel values arrive packed, since they are produced by
/// other modules; they are only interpreted far enough to encode them canonically.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvableValue {
    /// A packed counterparty client state
    ClientState(Any),
    /// A packed counterparty consensus state
    ConsensusState(Any),
    /// A packed `ibc.core.connection.v1.ConnectionEnd`
    ConnectionState(Any),
    /// A packed `ibc.core.channel.v1.Channel`
    ChannelState(Any),
    /// Packet commitment bytes
    PacketCommitment(Vec<u8>),
    /// Packet acknowledgement bytes
    PacketAcknowledgement(Vec<u8>),
    /// No acknowledgement has been written
    PacketAcknowledgementAbsence,
    /// Next sequence to be received
    NextSequenceRecv(u64),
}

impl ProvableValue {
    /// The tag the value is signed under.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::ClientState(_) => DataType::ClientState,
            Self::ConsensusState(_) => DataType::ConsensusState,
            Self::ConnectionState(_) => DataType::ConnectionState,
            Self::ChannelState(_) => DataType::ChannelState,
            Self::PacketCommitment(_) => DataType::PacketCommitment,
            Self::PacketAcknowledgement(_) => DataType::PacketAcknowledgement,
            Self::PacketAcknowledgementAbsence => DataType::PacketAcknowledgementAbsence,
            Self::NextSequenceRecv(_) => DataType::NextSequenceRecv,
        }
    }

    /// Encodes the kind-specific payload `{ timestamp, path, value }`.
    ///
    /// # Errors
    /// Returns [`SoloMachineClientError::InvalidInput`] if a packed value is not of the shape the
    /// variant requires, or an encoding error.
    pub fn data_bytes(
        &self,
        timestamp: u64,
        path: &MerklePath,
    ) -> Result<Vec<u8>, SoloMachineClientError> {
        let path = path.to_bytes();
        match self {
            Self::ClientState(client_state) => encode(&ClientStateData {
                timestamp,
                path,
                client_state: Some(packed_state(client_state)?.clone()),
            }),
            Self::ConsensusState(consensus_state) => encode(&ConsensusStateData {
                timestamp,
                path,
                consensus_state: Some(packed_state(consensus_state)?.clone()),
            }),
            Self::ConnectionState(connection) => encode(&ConnectionStateData {
                timestamp,
                path,
                connection: Some(unpack_connection(connection)?),
            }),
            Self::ChannelState(channel) => encode(&ChannelStateData {
                timestamp,
                path,
                channel: Some(unpack_channel(channel)?),
            }),
            Self::PacketCommitment(commitment) => encode(&PacketCommitmentData {
                timestamp,
                path,
                commitment: commitment.clone(),
            }),
            Self::PacketAcknowledgement(acknowledgement) => encode(&PacketAcknowledgementData {
                timestamp,
                path,
                acknowledgement: acknowledgement.clone(),
            }),
            Self::PacketAcknowledgementAbsence => {
                encode(&PacketAcknowledgementAbsenceData { timestamp, path })
            }
            Self::NextSequenceRecv(next_seq_recv) => encode(&NextSequenceRecvData {
                timestamp,
                path,
                next_seq_recv: *next_seq_recv,
            }),
        }
    }
}

impl From<ConnectionEnd> for ProvableValue {
    fn from(connection: ConnectionEnd) -> Self {
        Self::ConnectionState(pack_connection(&connection))
    }
}

impl From<Channel> for ProvableValue {
    fn from(channel: Channel) -> Self {
        Self::ChannelState(pack_channel(&channel))
    }
}

/// Wraps already encoded data in the sign bytes envelope.
///
/// # Errors
/// Returns an encoding error if the envelope cannot be serialized.
pub fn envelope(
    sequence: u64,
    diversifier: &str,
    data_type: DataType,
    data: Vec<u8>,
) -> Result<Vec<u8>, SoloMachineClientError> {
    encode(&SignBytes {
        sequence,
        diversifier: diversifier.to_string(),
        data_type: data_type.into(),
        data,
    })
}

/// Sign bytes of a fact proof.
///
/// # Errors
/// See [`ProvableValue::data_bytes`].
pub fn proof_sign_bytes(
    sequence: u64,
    timestamp: u64,
    diversifier: &str,
    path: &MerklePath,
    value: &ProvableValue,
) -> Result<Vec<u8>, SoloMachineClientError> {
    let data = value.data_bytes(timestamp, path)?;
    envelope(sequence, diversifier, value.data_type(), data)
}

/// Encodes the rotation payload of a header.
///
/// # Errors
/// Returns an encoding error if the payload cannot be serialized.
pub fn header_data_bytes(header: &Header) -> Result<Vec<u8>, SoloMachineClientError> {
    encode(&HeaderData {
        timestamp: header.timestamp,
        new_pub_key: Some(header.new_public_key.to_any()),
        new_diversifier: header.new_diversifier.clone(),
    })
}

/// Sign bytes of a header, under the diversifier trusted before the rotation.
///
/// # Errors
/// Returns an encoding error if the header cannot be serialized.
pub fn header_sign_bytes(
    diversifier: &str,
    header: &Header,
) -> Result<Vec<u8>, SoloMachineClientError> {
    envelope(
        header.sequence,
        diversifier,
        DataType::Header,
        header_data_bytes(header)?,
    )
}

pub(crate) fn encode<M: Message>(message: &M) -> Result<Vec<u8>, SoloMachineClientError> {
    let mut buf = Vec::with_capacity(message.encoded_len());
    message.encode(&mut buf)?;
    Ok(buf)
}

fn packed_state(any: &Any) -> Result<&Any, SoloMachineClientError> {
    ensure!(
        !any.type_url.is_empty(),
        SoloMachineClientError::invalid_input("packed state is missing its type url")
    );
    Ok(any)
}

fn unpack_connection(any: &Any) -> Result<ConnectionEnd, SoloMachineClientError> {
    ensure!(
        any.type_url == CONNECTION_END_TYPE_URL,
        SoloMachineClientError::invalid_input(format!(
            "expected type {CONNECTION_END_TYPE_URL}, got {}",
            any.type_url
        ))
    );
    ConnectionEnd::decode(any.value.as_slice()).map_err(|e| {
        SoloMachineClientError::invalid_input(format!("value is not a connection end: {e}"))
    })
}

fn unpack_channel(any: &Any) -> Result<Channel, SoloMachineClientError> {
    ensure!(
        any.type_url == CHANNEL_TYPE_URL,
        SoloMachineClientError::invalid_input(format!(
            "expected channel type {CHANNEL_TYPE_URL}, got {}",
            any.type_url
        ))
    );
    Channel::decode(any.value.as_slice())
        .map_err(|e| SoloMachineClientError::invalid_input(format!("value is not a channel: {e}")))
}
