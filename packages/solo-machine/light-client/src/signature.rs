//! Signature verification, dispatched on the scheme the trusted key declares.

use k256::ecdsa::signature::Verifier as _;

use crate::{error::SoloMachineClientError, public_key::PublicKey, public_key::SignatureScheme};

/// A signature scheme capability.
///
/// Implementations answer only yes or no: callers must not be able to learn why a
/// signature was rejected.
pub trait SignatureVerifier: Send + Sync {
    /// Whether `key` is a well formed verifying key of this scheme
    fn is_valid_key(&self, key: &[u8]) -> bool;

    /// Whether `signature` is a valid signature by `key` over `message`
    fn verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> bool;
}

/// Ed25519 with strict verification (no malleable or small order signatures).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

/// ECDSA on secp256k1 over SHA-256, accepting only low-S signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn is_valid_key(&self, key: &[u8]) -> bool {
        <[u8; 32]>::try_from(key)
            .ok()
            .and_then(|bytes| ed25519_dalek::VerifyingKey::from_bytes(&bytes).ok())
            .is_some()
    }

    fn verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        let Ok(bytes) = <[u8; 32]>::try_from(key) else {
            return false;
        };
        let Ok(verifying_key) = ed25519_dalek::VerifyingKey::from_bytes(&bytes) else {
            return false;
        };
        let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
            return false;
        };

        verifying_key.verify_strict(message, &signature).is_ok()
    }
}

impl SignatureVerifier for Secp256k1Verifier {
    fn is_valid_key(&self, key: &[u8]) -> bool {
        k256::ecdsa::VerifyingKey::from_sec1_bytes(key).is_ok()
    }

    fn verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(key) else {
            return false;
        };
        let Ok(signature) = k256::ecdsa::Signature::from_slice(signature) else {
            return false;
        };
        // high-S form of an otherwise valid signature
        if signature.normalize_s().is_some() {
            return false;
        }

        verifying_key.verify(message, &signature).is_ok()
    }
}

static ED25519: Ed25519Verifier = Ed25519Verifier;
static SECP256K1: Secp256k1Verifier = Secp256k1Verifier;

/// Capability table: the verifier backing each scheme tag.
#[must_use]
pub fn verifier_for(scheme: SignatureScheme) -> &'static dyn SignatureVerifier {
    match scheme {
        SignatureScheme::Ed25519 => &ED25519,
        SignatureScheme::Secp256k1 => &SECP256K1,
    }
}

/// Verifies that `signature` was produced by `public_key` over `sign_bytes`.
///
/// # Errors
/// Returns [`SoloMachineClientError::SignatureVerificationFailed`] on any mismatch, whether
/// the key is wrong, the signature is malformed or the bytes were tampered with.
pub fn verify_signature(
    public_key: &PublicKey,
    sign_bytes: &[u8],
    signature: &[u8],
) -> Result<(), SoloMachineClientError> {
    if verifier_for(public_key.scheme()).verify(public_key.as_bytes(), sign_bytes, signature) {
        Ok(())
    } else {
        Err(SoloMachineClientError::SignatureVerificationFailed)
    }
}
