//! A solo machine client shared between concurrent callers.
//!
//! Readers verify against an immutable [`ClientSnapshot`]. Header processing and misbehaviour
//! handling are serialized: each holds the write lock for its whole read, validate and replace
//! cycle, so readers observe either the old or the new snapshot and nothing in between.

use std::sync::{Arc, PoisonError, RwLock};

use ibc_proto::google::protobuf::Any;
use tracing::debug;

use crate::{
    client_state::{ClientState, Status},
    config::ClientConfig,
    error::SoloMachineClientError,
    header::Header,
    membership,
    misbehaviour::{self, Misbehaviour},
    path::MerklePath,
    update,
};

/// A client state together with the number of writes that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSnapshot {
    /// Incremented by every accepted header and by freezing
    pub revision: u64,
    /// Client state as of `revision`
    pub state: ClientState,
}

/// Single writer, many readers wrapper around a solo machine client state.
#[derive(Debug)]
pub struct SoloMachineClient {
    config: ClientConfig,
    inner: RwLock<Arc<ClientSnapshot>>,
}

impl SoloMachineClient {
    /// Instantiate a client from a trusted initial state.
    ///
    /// # Errors
    /// Returns [`SoloMachineClientError::InvalidInput`] if the initial state fails validation.
    pub fn new(
        config: ClientConfig,
        client_state: ClientState,
    ) -> Result<Self, SoloMachineClientError> {
        client_state.validate()?;
        Ok(Self {
            config,
            inner: RwLock::new(Arc::new(ClientSnapshot {
                revision: 0,
                state: client_state,
            })),
        })
    }

    /// The configuration every call on this client runs under.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The current snapshot. It stays valid, and unchanged, after later writes.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ClientSnapshot> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.snapshot().state.status()
    }

    /// Verifies and applies a key rotation header.
    ///
    /// # Errors
    /// See [`update::update_header`]. On error the client is left unchanged.
    pub fn update_header(
        &self,
        header: &Header,
    ) -> Result<Arc<ClientSnapshot>, SoloMachineClientError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let state = update::update_header(&self.config, &guard.state, header)?;

        let snapshot = Arc::new(ClientSnapshot {
            revision: guard.revision + 1,
            state,
        });
        *guard = Arc::clone(&snapshot);
        Ok(snapshot)
    }

    /// Checks misbehaviour evidence and freezes the client if it proves a conflict.
    ///
    /// Returns whether the client was frozen by this call.
    ///
    /// # Errors
    /// See [`misbehaviour::check_misbehaviour`]. On error the client is left unchanged.
    pub fn submit_misbehaviour(
        &self,
        misbehaviour: &Misbehaviour,
    ) -> Result<bool, SoloMachineClientError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !misbehaviour::check_misbehaviour(&guard.state, misbehaviour)? {
            debug!(sequence = misbehaviour.sequence, "misbehaviour evidence does not conflict");
            return Ok(false);
        }

        *guard = Arc::new(ClientSnapshot {
            revision: guard.revision + 1,
            state: misbehaviour::update_state_on_misbehaviour(&guard.state),
        });
        Ok(true)
    }

    /// See [`membership::verify_client_state`].
    ///
    /// # Errors
    /// Returns an error if the proof does not verify against the current snapshot.
    pub fn verify_client_state(
        &self,
        sequence: u64,
        timestamp: u64,
        path: &MerklePath,
        proof: &[u8],
        counterparty_client_state: &Any,
    ) -> Result<(), SoloMachineClientError> {
        membership::verify_client_state(
            &self.config,
            &self.snapshot().state,
            sequence,
            timestamp,
            path,
            proof,
            counterparty_client_state,
        )
    }

    /// See [`membership::verify_consensus_state`].
    ///
    /// # Errors
    /// Returns an error if the proof does not verify against the current snapshot.
    pub fn verify_consensus_state(
        &self,
        sequence: u64,
        timestamp: u64,
        path: &MerklePath,
        proof: &[u8],
        consensus_state: &Any,
    ) -> Result<(), SoloMachineClientError> {
        membership::verify_consensus_state(
            &self.config,
            &self.snapshot().state,
            sequence,
            timestamp,
            path,
            proof,
            consensus_state,
        )
    }

    /// See [`membership::verify_connection_state`].
    ///
    /// # Errors
    /// Returns an error if the proof does not verify against the current snapshot.
    pub fn verify_connection_state(
        &self,
        sequence: u64,
        timestamp: u64,
        path: &MerklePath,
        proof: &[u8],
        connection: &Any,
    ) -> Result<(), SoloMachineClientError> {
        membership::verify_connection_state(
            &self.config,
            &self.snapshot().state,
            sequence,
            timestamp,
            path,
            proof,
            connection,
        )
    }

    /// See [`membership::verify_channel_state`].
    ///
    /// # Errors
    /// Returns an error if the proof does not verify against the current snapshot.
    pub fn verify_channel_state(
        &self,
        sequence: u64,
        timestamp: u64,
        path: &MerklePath,
        proof: &[u8],
        channel: &Any,
    ) -> Result<(), SoloMachineClientError> {
        membership::verify_channel_state(
            &self.config,
            &self.snapshot().state,
            sequence,
            timestamp,
            path,
            proof,
            channel,
        )
    }

    /// See [`membership::verify_packet_commitment`].
    ///
    /// # Errors
    /// Returns an error if the proof does not verify against the current snapshot.
    pub fn verify_packet_commitment(
        &self,
        sequence: u64,
        timestamp: u64,
        path: &MerklePath,
        proof: &[u8],
        commitment: &[u8],
    ) -> Result<(), SoloMachineClientError> {
        membership::verify_packet_commitment(
            &self.config,
            &self.snapshot().state,
            sequence,
            timestamp,
            path,
            proof,
            commitment,
        )
    }

    /// See [`membership::verify_packet_acknowledgement`].
    ///
    /// # Errors
    /// Returns an error if the proof does not verify against the current snapshot.
    pub fn verify_packet_acknowledgement(
        &self,
        sequence: u64,
        timestamp: u64,
        path: &MerklePath,
        proof: &[u8],
        acknowledgement: &[u8],
    ) -> Result<(), SoloMachineClientError> {
        membership::verify_packet_acknowledgement(
            &self.config,
            &self.snapshot().state,
            sequence,
            timestamp,
            path,
            proof,
            acknowledgement,
        )
    }

    /// See [`membership::verify_packet_acknowledgement_absence`].
    ///
    /// # Errors
    /// Returns an error if the proof does not verify against the current snapshot.
    pub fn verify_packet_acknowledgement_absence(
        &self,
        sequence: u64,
        timestamp: u64,
        path: &MerklePath,
        proof: &[u8],
    ) -> Result<(), SoloMachineClientError> {
        membership::verify_packet_acknowledgement_absence(
            &self.config,
            &self.snapshot().state,
            sequence,
            timestamp,
            path,
            proof,
        )
    }

    /// See [`membership::verify_next_sequence_recv`].
    ///
    /// # Errors
    /// Returns an error if the proof does not verify against the current snapshot.
    pub fn verify_next_sequence_recv(
        &self,
        sequence: u64,
        timestamp: u64,
        path: &MerklePath,
        proof: &[u8],
        next_sequence_recv: u64,
    ) -> Result<(), SoloMachineClientError> {
        membership::verify_next_sequence_recv(
            &self.config,
            &self.snapshot().state,
            sequence,
            timestamp,
            path,
            proof,
            next_sequence_recv,
        )
    }
}
