//! Trusted public keys and their packed representation.

use core::{fmt, str::FromStr};

use cosmos_sdk_proto::cosmos::crypto::{ed25519, secp256k1};
use ibc_proto::google::protobuf::Any;
use prost::Message;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::{ensure, error::SoloMachineClientError, signature};

/// Type url of a packed ed25519 public key
pub const ED25519_PUB_KEY_TYPE_URL: &str = "/cosmos.crypto.ed25519.PubKey";
/// Type url of a packed secp256k1 public key
pub const SECP256K1_PUB_KEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// The signature scheme a public key declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureScheme {
    /// Ed25519 over the raw message
    Ed25519,
    /// ECDSA on secp256k1 over the SHA-256 digest of the message
    Secp256k1,
}

impl SignatureScheme {
    /// The protobuf type url keys of this scheme are packed under.
    #[must_use]
    pub const fn type_url(self) -> &'static str {
        match self {
            Self::Ed25519 => ED25519_PUB_KEY_TYPE_URL,
            Self::Secp256k1 => SECP256K1_PUB_KEY_TYPE_URL,
        }
    }

    /// Resolve a scheme from the type url of a packed key.
    ///
    /// # Errors
    /// Returns [`SoloMachineClientError::UnsupportedScheme`] for unknown type urls.
    pub fn from_type_url(type_url: &str) -> Result<Self, SoloMachineClientError> {
        match type_url {
            ED25519_PUB_KEY_TYPE_URL => Ok(Self::Ed25519),
            SECP256K1_PUB_KEY_TYPE_URL => Ok(Self::Secp256k1),
            other => Err(SoloMachineClientError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
        })
    }
}

impl FromStr for SignatureScheme {
    type Err = SoloMachineClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ed25519" => Ok(Self::Ed25519),
            "secp256k1" => Ok(Self::Secp256k1),
            other => Err(SoloMachineClientError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// A verifying key together with the scheme it belongs to.
///
/// Deserialization goes through [`PublicKey::new`], so a malformed key never becomes trusted.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPublicKey")]
pub struct PublicKey {
    scheme: SignatureScheme,
    #[serde_as(as = "Hex")]
    key: Vec<u8>,
}

/// Unchecked serde form of [`PublicKey`].
#[serde_as]
#[derive(Deserialize)]
struct RawPublicKey {
    scheme: SignatureScheme,
    #[serde_as(as = "Hex")]
    key: Vec<u8>,
}

impl TryFrom<RawPublicKey> for PublicKey {
    type Error = SoloMachineClientError;

    fn try_from(raw: RawPublicKey) -> Result<Self, Self::Error> {
        Self::new(raw.scheme, raw.key)
    }
}

impl PublicKey {
    /// Create a public key, checking that the bytes are a valid key of the scheme.
    ///
    /// # Errors
    /// Returns [`SoloMachineClientError::InvalidInput`] if the key bytes are malformed.
    pub fn new(scheme: SignatureScheme, key: Vec<u8>) -> Result<Self, SoloMachineClientError> {
        ensure!(
            signature::verifier_for(scheme).is_valid_key(&key),
            SoloMachineClientError::invalid_input(format!("malformed {scheme} public key"))
        );
        Ok(Self { scheme, key })
    }

    /// The scheme this key verifies under.
    #[must_use]
    pub const fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Pack the key as a protobuf `Any`.
    #[must_use]
    pub fn to_any(&self) -> Any {
        let value = match self.scheme {
            SignatureScheme::Ed25519 => ed25519::PubKey {
                key: self.key.clone(),
            }
            .encode_to_vec(),
            SignatureScheme::Secp256k1 => secp256k1::PubKey {
                key: self.key.clone(),
            }
            .encode_to_vec(),
        };

        Any {
            type_url: self.scheme.type_url().to_string(),
            value,
        }
    }
}

impl TryFrom<&Any> for PublicKey {
    type Error = SoloMachineClientError;

    fn try_from(any: &Any) -> Result<Self, Self::Error> {
        let scheme = SignatureScheme::from_type_url(&any.type_url)?;
        let key = match scheme {
            SignatureScheme::Ed25519 => ed25519::PubKey::decode(any.value.as_slice())?.key,
            SignatureScheme::Secp256k1 => secp256k1::PubKey::decode(any.value.as_slice())?.key,
        };
        Self::new(scheme, key)
    }
}
