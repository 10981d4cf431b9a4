use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::types::{BinaryEncoding, NullFields};

/// Options for turning rows into JSON.
///
/// The date/time pattern is fixed and has no option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    pub binary_encoding: BinaryEncoding,
    pub null_fields: NullFields,
}

impl BridgeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> BridgeOptionsBuilder {
        BridgeOptionsBuilder::new()
    }

    #[must_use]
    pub fn with_binary_encoding(mut self, binary_encoding: BinaryEncoding) -> Self {
        self.binary_encoding = binary_encoding;
        self
    }

    #[must_use]
    pub fn with_null_fields(mut self, null_fields: NullFields) -> Self {
        self.null_fields = null_fields;
        self
    }

    /// Parse options from a JSON document, e.g. a section of the host's config.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `BridgeError::Config` if the document is malformed or names an unknown value.
    pub fn from_json_str(raw: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(raw).map_err(|e| BridgeError::Config(format!("bridge options: {e}")))
    }
}

/// Fluent builder for [`BridgeOptions`].
#[derive(Debug, Clone, Default)]
pub struct BridgeOptionsBuilder {
    opts: BridgeOptions,
}

impl BridgeOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn binary_encoding(mut self, binary_encoding: BinaryEncoding) -> Self {
        self.opts.binary_encoding = binary_encoding;
        self
    }

    #[must_use]
    pub fn null_fields(mut self, null_fields: NullFields) -> Self {
        self.opts.null_fields = null_fields;
        self
    }

    #[must_use]
    pub fn finish(self) -> BridgeOptions {
        self.opts
    }
}
