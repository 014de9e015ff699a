//! Solo machine light client update logic

use tracing::info;

use crate::{
    client_state::ClientState, config::ClientConfig, consensus_state::ConsensusState,
    error::SoloMachineClientError, header::Header, verify::verify_header,
};

/// Verifies `header` and returns the rotated client state.
///
/// The input is left untouched, so a rejected header changes nothing and may be retried.
///
/// # Errors
/// See [`verify_header`].
pub fn update_header(
    config: &ClientConfig,
    client_state: &ClientState,
    header: &Header,
) -> Result<ClientState, SoloMachineClientError> {
    verify_header(config, client_state, header)?;
    let new_client_state = update_state(client_state, header)?;

    info!(
        sequence = new_client_state.sequence,
        scheme = %header.new_public_key.scheme(),
        diversifier = %header.new_diversifier,
        "solo machine key rotated"
    );
    Ok(new_client_state)
}

/// Applies an already verified header: swaps key and diversifier, takes the header timestamp
/// and advances the sequence by one.
///
/// # Errors
/// Returns [`SoloMachineClientError::InvalidHeader`] if the sequence would overflow.
pub fn update_state(
    client_state: &ClientState,
    header: &Header,
) -> Result<ClientState, SoloMachineClientError> {
    let sequence = client_state
        .sequence
        .checked_add(1)
        .ok_or_else(|| SoloMachineClientError::invalid_header("sequence overflow"))?;

    Ok(ClientState {
        sequence,
        consensus_state: ConsensusState {
            public_key: header.new_public_key.clone(),
            diversifier: header.new_diversifier.clone(),
            timestamp: header.timestamp,
        },
        ..client_state.clone()
    })
}
