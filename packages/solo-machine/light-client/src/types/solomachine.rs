//! Raw solo machine client messages as they cross module boundaries.
#![allow(missing_docs)]

use ibc_proto::google::protobuf::Any;

/// Raw client state of a solo machine client.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClientState {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(bool, tag = "2")]
    pub is_frozen: bool,
    #[prost(message, optional, tag = "3")]
    pub consensus_state: Option<ConsensusState>,
}

/// Raw consensus state: the trusted key and its context.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusState {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<Any>,
    #[prost(string, tag = "2")]
    pub diversifier: String,
    #[prost(uint64, tag = "3")]
    pub timestamp: u64,
}

/// Raw key rotation header.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Header {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
    #[prost(bytes = "vec", tag = "3")]
    pub signature: Vec<u8>,
    #[prost(message, optional, tag = "4")]
    pub new_public_key: Option<Any>,
    #[prost(string, tag = "5")]
    pub new_diversifier: String,
}

/// Raw misbehaviour: two signatures by the trusted key at one sequence.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Misbehaviour {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(message, optional, tag = "2")]
    pub signature_one: Option<SignatureAndData>,
    #[prost(message, optional, tag = "3")]
    pub signature_two: Option<SignatureAndData>,
}

/// A signature together with the payload it was produced over.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignatureAndData {
    #[prost(bytes = "vec", tag = "1")]
    pub signature: Vec<u8>,
    #[prost(enumeration = "super::DataType", tag = "2")]
    pub data_type: i32,
    #[prost(bytes = "vec", tag = "3")]
    pub data: Vec<u8>,
}
