//! Cache key derivation
//!
//! Keys are a pure function of the tier and the fields that make cached
//! content incompatible: tool, version and registry for the binary tier,
//! tool and registry for the store tier. The registry URL is taken as typed,
//! so `https://x/` and `https://x` are different namespaces.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// How a key is rendered for the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStyle {
    /// SHA-256 of the fields, URL-safe base64 (fixed length, no `/` or `+`)
    #[default]
    Digest,
    /// Fields joined by `-`, for backends that accept any characters
    Raw,
}

/// The two independently enabled cache scopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierKind {
    /// Directory holding the installed executable
    Binary,
    /// Package manager artifact store, shared across versions
    Store,
}

impl TierKind {
    fn tag(&self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Store => write!(f, "store"),
        }
    }
}

/// Derives backend keys for both tiers
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDeriver {
    style: KeyStyle,
}

impl KeyDeriver {
    pub fn new(style: KeyStyle) -> Self {
        Self { style }
    }

    /// Key for the installed binary of `tool` at `version` from `registry`
    pub fn binary(&self, tool: &str, version: &str, registry: &str) -> String {
        self.render(&[tool, TierKind::Binary.tag(), version, registry])
    }

    /// Key for the artifact store used with `registry`
    pub fn store(&self, tool: &str, registry: &str) -> String {
        self.render(&[tool, TierKind::Store.tag(), registry])
    }

    fn render(&self, fields: &[&str]) -> String {
        match self.style {
            KeyStyle::Raw => fields.join("-"),
            KeyStyle::Digest => {
                let mut hasher = Sha256::new();
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        hasher.update([0u8]);
                    }
                    hasher.update(field.as_bytes());
                }
                URL_SAFE_NO_PAD.encode(hasher.finalize())
            }
        }
    }
}
