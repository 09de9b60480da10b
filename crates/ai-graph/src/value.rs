use std::fmt;

use serde::{Deserialize, Serialize};

use crate::NodeId;

/// A raw parameter value stored on a surface node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Blob(Vec<u8>),
    Float2([f32; 2]),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Encode a node id list as a blob of little-endian `u32`s.
    pub fn id_list(ids: impl IntoIterator<Item = u32>) -> Self {
        Value::Blob(ids.into_iter().flat_map(u32::to_le_bytes).collect())
    }

    /// Decode a blob of little-endian `u32` node ids. A truncated trailing id is ignored.
    pub fn as_id_list(&self) -> Option<Vec<NodeId>> {
        let bytes = self.as_blob()?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|c| NodeId(u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                .collect(),
        )
    }

    /// Compact (8-bit) text form: a string value, or a blob holding UTF-8 text.
    pub fn as_ansi_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Blob(bytes) => std::str::from_utf8(bytes)
                .ok()
                .map(|s| s.trim_end_matches('\0')),
            _ => None,
        }
    }

    /// Wide text form: a blob holding UTF-16LE code units.
    pub fn as_wide_string(&self) -> Option<String> {
        let Value::Blob(bytes) = self else {
            return None;
        };
        if bytes.is_empty() || bytes.len() % 2 != 0 {
            return None;
        }
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16(&units)
            .ok()
            .map(|s| s.trim_end_matches('\0').to_string())
    }

    /// Best-effort text rendering, used for diagnostics.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Blob(bytes) => match self.as_ansi_str() {
                Some(s) => s.to_string(),
                None => String::from_utf8_lossy(bytes).into_owned(),
            },
            Value::Float2([x, y]) => format!("({x}, {y})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Blob(bytes)
    }
}
