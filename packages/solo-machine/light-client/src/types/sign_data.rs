//! Sign byte envelope and the per-kind data payloads it wraps.
#![allow(missing_docs)]

use ibc_proto::{
    google::protobuf::Any,
    ibc::core::{channel::v1::Channel, connection::v1::ConnectionEnd},
};

/// The envelope every solo machine signature covers.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct SignBytes {
    /// Client sequence the signature is valid for
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    /// Diversifier of the trusted consensus state
    #[prost(string, tag = "2")]
    pub diversifier: String,
    /// Kind of the payload in `data`
    #[prost(enumeration = "DataType", tag = "3")]
    pub data_type: i32,
    /// Encoded kind-specific payload
    #[prost(bytes = "vec", tag = "4")]
    pub data: Vec<u8>,
}

/// Tag naming the payload kind carried in [`SignBytes::data`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    ::prost::Enumeration,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum DataType {
    /// Never signed
    Unspecified = 0,
    /// [`ClientStateData`]
    ClientState = 1,
    /// [`ConsensusStateData`]
    ConsensusState = 2,
    /// [`ConnectionStateData`]
    ConnectionState = 3,
    /// [`ChannelStateData`]
    ChannelState = 4,
    /// [`PacketCommitmentData`]
    PacketCommitment = 5,
    /// [`PacketAcknowledgementData`]
    PacketAcknowledgement = 6,
    /// [`PacketAcknowledgementAbsenceData`]
    PacketAcknowledgementAbsence = 7,
    /// [`NextSequenceRecvData`]
    NextSequenceRecv = 8,
    /// [`HeaderData`]
    Header = 9,
}

/// Key rotation payload signed by the currently trusted key.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeaderData {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(message, optional, tag = "2")]
    pub new_pub_key: Option<Any>,
    #[prost(string, tag = "3")]
    pub new_diversifier: String,
}

/// Proof payload for a counterparty client state.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClientStateData {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub path: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub client_state: Option<Any>,
}

/// Proof payload for a counterparty consensus state.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusStateData {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub path: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub consensus_state: Option<Any>,
}

/// Proof payload for a connection end.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConnectionStateData {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub path: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub connection: Option<ConnectionEnd>,
}

/// Proof payload for a channel end.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChannelStateData {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub path: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub channel: Option<Channel>,
}

/// Proof payload for a packet commitment.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PacketCommitmentData {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub path: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub commitment: Vec<u8>,
}

/// Proof payload for a packet acknowledgement.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PacketAcknowledgementData {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub path: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub acknowledgement: Vec<u8>,
}

/// Proof payload for the absence of a packet acknowledgement.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PacketAcknowledgementAbsenceData {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub path: Vec<u8>,
}

/// Proof payload for the next sequence to be received on a channel.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NextSequenceRecvData {
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub path: Vec<u8>,
    #[prost(uint64, tag = "3")]
    pub next_seq_recv: u64,
}

/// Common view over the data payloads, used to compare two signed facts.
pub trait SignData: ::prost::Message + Default {
    /// The tag this payload is signed under
    const DATA_TYPE: DataType;

    /// Canonical path bytes the fact is about; empty for headers
    fn path(&self) -> &[u8];

    /// Drops the timestamp so that two payloads can be compared by content
    fn clear_timestamp(&mut self);
}

macro_rules! impl_sign_data {
    ($($ty:ty => $data_type:ident),+ $(,)?) => {
        $(
            impl SignData for $ty {
                const DATA_TYPE: DataType = DataType::$data_type;

                fn path(&self) -> &[u8] {
                    &self.path
                }

                fn clear_timestamp(&mut self) {
                    self.timestamp = 0;
                }
            }
        )+
    };
}

impl_sign_data![
    ClientStateData => ClientState,
    ConsensusStateData => ConsensusState,
    ConnectionStateData => ConnectionState,
    ChannelStateData => ChannelState,
    PacketCommitmentData => PacketCommitment,
    PacketAcknowledgementData => PacketAcknowledgement,
    PacketAcknowledgementAbsenceData => PacketAcknowledgementAbsence,
    NextSequenceRecvData => NextSequenceRecv,
];

impl SignData for HeaderData {
    const DATA_TYPE: DataType = DataType::Header;

    fn path(&self) -> &[u8] {
        &[]
    }

    fn clear_timestamp(&mut self) {
        self.timestamp = 0;
    }
}
