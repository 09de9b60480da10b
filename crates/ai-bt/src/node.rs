use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Behavioral category of an AI node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Tree entry point. The root is itself a compound (it runs its children in sequence).
    Root,
    Compound,
    Decorator,
    Task,
}

impl NodeKind {
    pub const fn is_root(self) -> bool {
        matches!(self, NodeKind::Root)
    }

    /// Aggregates an ordered child list.
    pub const fn is_compound(self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Compound)
    }

    pub const fn is_decorator(self) -> bool {
        matches!(self, NodeKind::Decorator)
    }

    /// May carry decorators. The root cannot.
    pub const fn is_decoratable(self) -> bool {
        !self.is_root()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Root => "root",
            NodeKind::Compound => "compound",
            NodeKind::Decorator => "decorator",
            NodeKind::Task => "task",
        })
    }
}

pub trait BehaviorTreeNode: fmt::Debug + 'static {
    fn type_name(&self) -> &'static str;

    fn kind(&self) -> NodeKind;

    /// Bytes of runtime execution state this node needs in the tree's state blob.
    fn state_size(&self) -> usize {
        0
    }

    /// Apply serialized parameters. Fields absent from `params` keep their current values.
    fn load_params(&mut self, params: &serde_json::Value) -> Result<(), serde_json::Error> {
        let _ = params;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
}

/// A node type that can be registered by name and default-constructed.
pub trait NodeType: BehaviorTreeNode + Default {
    const TYPE_NAME: &'static str;
    const KIND: NodeKind;
}

/// Non-owning reference to a node: its index in the graph's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(pub(crate) usize);

impl NodeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExecutionSlot {
    index: usize,
    memory_offset: usize,
}

/// A live AI node plus the layout data assigned to it by the compiler.
///
/// The instance is owned by its graph node; every reference it holds to other nodes is a
/// [`NodeHandle`], so dropping the graph drops all instances without dangling links.
#[derive(Debug)]
pub struct NodeInstance {
    node: Box<dyn BehaviorTreeNode>,
    slot: Option<ExecutionSlot>,
    parent: Option<NodeHandle>,
    decorators: Vec<NodeHandle>,
    children: Vec<NodeHandle>,
}

impl NodeInstance {
    pub fn new(node: Box<dyn BehaviorTreeNode>) -> Self {
        Self {
            node,
            slot: None,
            parent: None,
            decorators: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn node(&self) -> &dyn BehaviorTreeNode {
        &*self.node
    }

    pub fn node_mut(&mut self) -> &mut dyn BehaviorTreeNode {
        &mut *self.node
    }

    pub fn downcast_ref<T: BehaviorTreeNode>(&self) -> Option<&T> {
        self.node.as_any().downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.node.type_name()
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    pub fn state_size(&self) -> usize {
        self.node.state_size()
    }

    pub fn is_compound(&self) -> bool {
        self.kind().is_compound()
    }

    pub fn is_decorator(&self) -> bool {
        self.kind().is_decorator()
    }

    pub fn is_decoratable(&self) -> bool {
        self.kind().is_decoratable()
    }

    pub fn is_compiled(&self) -> bool {
        self.slot.is_some()
    }

    /// Preorder position in the compiled tree; `None` when the node was not compiled.
    pub fn execution_index(&self) -> Option<usize> {
        self.slot.map(|s| s.index)
    }

    /// Start of this node's region in the state blob; `None` when the node was not compiled.
    pub fn memory_offset(&self) -> Option<usize> {
        self.slot.map(|s| s.memory_offset)
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    pub fn decorators(&self) -> &[NodeHandle] {
        &self.decorators
    }

    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    pub fn set_parent(&mut self, parent: NodeHandle) {
        self.parent = Some(parent);
    }

    pub fn append_child(&mut self, child: NodeHandle) {
        debug_assert!(self.is_compound(), "append_child on a non-compound node");
        self.children.push(child);
    }

    pub fn append_decorator(&mut self, decorator: NodeHandle) {
        debug_assert!(self.is_decoratable(), "append_decorator on a non-decoratable node");
        self.decorators.push(decorator);
    }

    pub(crate) fn assign_slot(&mut self, index: usize, memory_offset: usize) {
        self.slot = Some(ExecutionSlot {
            index,
            memory_offset,
        });
    }

    /// Forget everything the compiler assigned.
    pub fn reset_layout(&mut self) {
        self.slot = None;
        self.parent = None;
        self.decorators.clear();
        self.children.clear();
    }
}
