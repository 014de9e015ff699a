//! Protobuf wire types of the solo machine light client.
//!
//! Every signature checked by this crate covers bytes produced by these
//! messages, so field numbers here are part of the trust boundary.

pub mod sign_data;
pub mod solomachine;

pub use sign_data::{
    ChannelStateData, ClientStateData, ConnectionStateData, ConsensusStateData, DataType,
    HeaderData, NextSequenceRecvData, PacketAcknowledgementAbsenceData, PacketAcknowledgementData,
    PacketCommitmentData, SignBytes,
};

/// Type url of a packed [`solomachine::ClientState`]
pub const SOLO_MACHINE_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.solomachine.v1.ClientState";
/// Type url of a packed [`solomachine::ConsensusState`]
pub const SOLO_MACHINE_CONSENSUS_STATE_TYPE_URL: &str =
    "/ibc.lightclients.solomachine.v1.ConsensusState";
/// Type url of a packed [`solomachine::Header`]
pub const SOLO_MACHINE_HEADER_TYPE_URL: &str = "/ibc.lightclients.solomachine.v1.Header";
/// Type url of a packed connection end
pub const CONNECTION_END_TYPE_URL: &str = "/ibc.core.connection.v1.ConnectionEnd";
/// Type url of a packed channel end
pub const CHANNEL_TYPE_URL: &str = "/ibc.core.channel.v1.Channel";
