//! On-disk archive representation
//!
//! An archive file is a JSON document:
//!
//! ```json
//! {
//!   "format": "strata-archive",
//!   "version": 1,
//!   "root": {
//!     "name": "/",
//!     "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1],
//!     "payload": null,
//!     "children": [ { "name": "a", "children": [] } ]
//!   }
//! }
//! ```
//!
//! Transforms are 16 doubles in column-major order (the layout of
//! [`DMat4::to_cols_array`]). `transform`, `payload` and `children` may be
//! omitted and default to identity, no payload and no children. An explicit
//! `"payload": null` also means no payload.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strata_core::{Result, StrataError};

/// Value of the `format` field every archive must carry.
pub const FORMAT_TAG: &str = "strata-archive";

/// Highest document version this crate understands.
pub const FORMAT_VERSION: u32 = 1;

/// Top level archive document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveDocument {
    pub format: String,
    pub version: u32,
    pub root: NodeDocument,
}

/// One node of an archive document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub name: String,
    #[serde(default = "identity_cols")]
    pub transform: [f64; 16],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDocument>,
}

fn identity_cols() -> [f64; 16] {
    DMat4::IDENTITY.to_cols_array()
}

impl ArchiveDocument {
    /// Wraps `root` in a document of the current format version.
    #[must_use]
    pub fn new(root: NodeDocument) -> Self {
        Self {
            format: FORMAT_TAG.to_string(),
            version: FORMAT_VERSION,
            root,
        }
    }

    /// Decodes and validates a document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let document: Self = serde_json::from_slice(bytes)?;
        document.validate()?;
        Ok(document)
    }

    /// Checks the format header.
    ///
    /// Structural checks on the node tree (duplicate or invalid names) happen
    /// when the document is turned into a [`SceneArchive`](crate::SceneArchive).
    pub fn validate(&self) -> Result<()> {
        if self.format != FORMAT_TAG {
            return Err(StrataError::InvalidFormat(format!(
                "unexpected format tag '{}', expected '{FORMAT_TAG}'",
                self.format
            )));
        }
        if self.version == 0 || self.version > FORMAT_VERSION {
            return Err(StrataError::InvalidFormat(format!(
                "unsupported archive version {} (supported: 1..={FORMAT_VERSION})",
                self.version
            )));
        }
        Ok(())
    }
}

impl NodeDocument {
    /// A childless node with an identity transform and no payload.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: identity_cols(),
            payload: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: DMat4) -> Self {
        self.transform = transform.to_cols_array();
        self
    }

    #[must_use]
    pub fn with_translation(self, translation: DVec3) -> Self {
        self.with_transform(DMat4::from_translation(translation))
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: NodeDocument) -> Self {
        self.children.push(child);
        self
    }

    #[inline]
    #[must_use]
    pub fn transform(&self) -> DMat4 {
        DMat4::from_cols_array(&self.transform)
    }
}
