use serde::{Deserialize, Serialize};

/// Meta entry holding a node's placement on the surface, stored as two little-endian `f32`s.
pub const POSITION_META_ENTRY: i32 = 11;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub type_id: i32,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl MetaEntry {
    pub fn new(type_id: i32, data: Vec<u8>) -> Self {
        Self { type_id, data }
    }

    pub fn float2(x: f32, y: f32) -> Self {
        let mut data = Vec::with_capacity(8);
        data.extend_from_slice(&x.to_le_bytes());
        data.extend_from_slice(&y.to_le_bytes());
        Self::new(POSITION_META_ENTRY, data)
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// Decode the entry payload as a 2D vector. Truncated payloads decode to `None`.
    pub fn as_float2(&self) -> Option<[f32; 2]> {
        let x = self.data.get(0..4)?;
        let y = self.data.get(4..8)?;
        Some([
            f32::from_le_bytes([x[0], x[1], x[2], x[3]]),
            f32::from_le_bytes([y[0], y[1], y[2], y[3]]),
        ])
    }
}

/// Editor metadata attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta {
    entries: Vec<MetaEntry>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[MetaEntry] {
        &self.entries
    }

    pub fn entry(&self, type_id: i32) -> Option<&MetaEntry> {
        self.entries.iter().find(|e| e.type_id == type_id)
    }

    /// Insert or replace the entry with the same type id.
    pub fn set(&mut self, entry: MetaEntry) {
        match self.entries.iter_mut().find(|e| e.type_id == entry.type_id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
