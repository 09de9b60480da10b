use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Meta, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Classification codes: the node archetype group and the type within that group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeClass {
    pub group_id: u16,
    pub type_id: u16,
}

impl NodeClass {
    pub const fn new(group_id: u16, type_id: u16) -> Self {
        Self { group_id, type_id }
    }
}

/// The far end of a box connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub node: NodeId,
    #[serde(default)]
    pub box_id: u8,
}

impl Connection {
    pub fn new(node: NodeId, box_id: u8) -> Self {
        Self { node, box_id }
    }
}

/// A node port with its ordered connection list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphBox {
    pub id: u8,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceNode {
    pub id: NodeId,
    #[serde(flatten)]
    pub class: NodeClass,
    #[serde(default)]
    pub values: Vec<Value>,
    #[serde(default)]
    pub boxes: Vec<GraphBox>,
    #[serde(default)]
    pub meta: Meta,
}

impl SurfaceNode {
    pub fn new(id: NodeId, class: NodeClass) -> Self {
        Self {
            id,
            class,
            values: Vec::new(),
            boxes: Vec::new(),
            meta: Meta::default(),
        }
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn graph_box(&self, id: u8) -> Option<&GraphBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    /// Connections of the given box, empty when the box is absent.
    pub fn connections(&self, box_id: u8) -> &[Connection] {
        self.graph_box(box_id)
            .map(|b| b.connections.as_slice())
            .unwrap_or(&[])
    }
}
