use std::collections::BTreeMap;

use crate::node::{BehaviorTreeNode, NodeKind, NodeType};
use crate::nodes::*;

type Constructor = fn() -> Box<dyn BehaviorTreeNode>;

/// A resolved, instantiable node type.
#[derive(Debug, Clone, Copy)]
pub struct TypeHandle {
    name: &'static str,
    kind: NodeKind,
    construct: Constructor,
}

impl TypeHandle {
    pub fn of<T: NodeType>() -> Self {
        Self {
            name: T::TYPE_NAME,
            kind: T::KIND,
            construct: construct::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

fn construct<T: NodeType>() -> Box<dyn BehaviorTreeNode> {
    Box::new(T::default())
}

/// Name-to-type lookup used while resolving surface nodes.
pub trait TypeRegistry {
    fn resolve(&self, name: &str) -> Option<TypeHandle>;

    fn instantiate(&self, handle: &TypeHandle) -> Box<dyn BehaviorTreeNode> {
        (handle.construct)()
    }
}

/// Map-backed registry.
///
/// Names resolve exactly first; a namespaced name (`Game.AI.MyTask`) falls back to its last
/// segment.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    types: BTreeMap<String, TypeHandle>,
}

impl NodeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_nodes() -> Self {
        let mut registry = Self::new();
        registry
            .register::<BehaviorTreeRootNode>()
            .register::<BehaviorTreeSequenceNode>()
            .register::<BehaviorTreeSelectorNode>()
            .register::<BehaviorTreeDelayNode>()
            .register::<BehaviorTreeSubTreeNode>()
            .register::<BehaviorTreeInvertDecorator>()
            .register::<BehaviorTreeForceSuccessDecorator>()
            .register::<BehaviorTreeForceFailedDecorator>()
            .register::<BehaviorTreeLoopDecorator>()
            .register::<BehaviorTreeTimeLimitDecorator>()
            .register::<BehaviorTreeCooldownDecorator>();
        registry
    }

    pub fn register<T: NodeType>(&mut self) -> &mut Self {
        self.register_handle(TypeHandle::of::<T>())
    }

    pub fn register_handle(&mut self, handle: TypeHandle) -> &mut Self {
        if self.types.insert(handle.name.to_string(), handle).is_some() {
            tracing::debug!(type_name = handle.name, "node type re-registered");
        }
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered types, sorted by name.
    pub fn types(&self) -> impl Iterator<Item = &TypeHandle> {
        self.types.values()
    }
}

impl TypeRegistry for NodeTypeRegistry {
    fn resolve(&self, name: &str) -> Option<TypeHandle> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(handle) = self.types.get(name) {
            return Some(*handle);
        }
        let (_, short) = name.rsplit_once('.')?;
        self.types.get(short).copied()
    }
}
