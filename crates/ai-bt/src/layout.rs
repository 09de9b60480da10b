use serde::{Deserialize, Serialize};

use crate::node::NodeKind;

/// One compiled node. Node references are surface node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub id: u32,
    pub type_name: String,
    pub kind: NodeKind,
    pub execution_index: usize,
    pub memory_offset: usize,
    pub state_size: usize,
    pub parent: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<u32>,
}

/// The compiled tree in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLayout {
    pub nodes_count: usize,
    pub nodes_states_size: usize,
    pub nodes: Vec<NodeLayout>,
}

impl TreeLayout {
    pub fn node(&self, id: u32) -> Option<&NodeLayout> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Node ids in execution order.
    pub fn execution_order(&self) -> Vec<u32> {
        self.nodes.iter().map(|n| n.id).collect()
    }
}
