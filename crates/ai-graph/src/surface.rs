use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{NodeId, SurfaceNode};

/// Highest surface document version this crate understands.
pub const SURFACE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Malformed surface data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported surface version {found} (expected <= {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Duplicate node id {0}")]
    DuplicateNode(NodeId),
}

/// Serialized surface: the byte stream a graph is loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDocument {
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<SurfaceNode>,
}

impl Default for SurfaceDocument {
    fn default() -> Self {
        Self {
            version: SURFACE_VERSION,
            nodes: Vec::new(),
        }
    }
}

impl SurfaceDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SurfaceError> {
        let doc: Self = serde_json::from_slice(bytes)?;
        if doc.version == 0 || doc.version > SURFACE_VERSION {
            return Err(SurfaceError::UnsupportedVersion {
                found: doc.version,
                expected: SURFACE_VERSION,
            });
        }
        Ok(doc)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SurfaceError> {
        Ok(serde_json::to_vec(self)?)
    }
}
