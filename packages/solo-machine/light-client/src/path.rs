//! Canonical rendering of the commitment paths bound into proofs.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{ensure, error::SoloMachineClientError};

/// A commitment path made of ordered key segments, e.g. `["ibc", "commitments/ports/transfer"]`.
///
/// Proofs never encode this structure directly: they sign [`MerklePath::to_bytes`], the
/// canonical string form. Each segment is rendered behind a `/` with `%` and `/` escaped so
/// that two different paths can never render to the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct MerklePath {
    key_path: Vec<String>,
}

impl MerklePath {
    /// Create a path from its key segments.
    ///
    /// # Errors
    /// Returns [`SoloMachineClientError::InvalidInput`] if the path has no segments.
    pub fn new<I, S>(segments: I) -> Result<Self, SoloMachineClientError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key_path: Vec<String> = segments.into_iter().map(Into::into).collect();
        ensure!(
            !key_path.is_empty(),
            SoloMachineClientError::invalid_input("merkle path must have at least one segment")
        );
        Ok(Self { key_path })
    }

    /// The key segments of the path.
    #[must_use]
    pub fn key_path(&self) -> &[String] {
        &self.key_path
    }

    /// The canonical string form as bytes, which is what proofs sign over.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl TryFrom<Vec<String>> for MerklePath {
    type Error = SoloMachineClientError;

    fn try_from(key_path: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(key_path)
    }
}

impl From<MerklePath> for Vec<String> {
    fn from(path: MerklePath) -> Self {
        path.key_path
    }
}

impl fmt::Display for MerklePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.key_path {
            f.write_str("/")?;
            for c in segment.chars() {
                match c {
                    '%' => f.write_str("%25")?,
                    '/' => f.write_str("%2F")?,
                    c => fmt::Write::write_char(f, c)?,
                }
            }
        }
        Ok(())
    }
}
