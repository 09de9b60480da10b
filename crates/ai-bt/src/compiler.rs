//! Preorder compilation of the tree reachable from the root.

use ai_graph::{Connection, Graph, MetaEntry, NodeId, SurfaceNode, Value};
use ai_tools::{TraceEvent, TraceSink};

use crate::config::{CompilerConfig, CyclePolicy};
use crate::error::LoadError;
use crate::node::{NodeHandle, NodeInstance};

/// Aggregate counters of one compile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompiledTree {
    pub nodes_count: usize,
    pub nodes_states_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Decorator,
    Child,
}

/// A node whose links are still being walked.
struct Frame {
    handle: NodeHandle,
    id: NodeId,
    links: std::vec::IntoIter<(Link, NodeId)>,
}

/// Sort key placing children left to right: the X coordinate from the placement meta entry, or
/// the node id when the entry is missing or empty.
pub fn child_sort_key(node: &SurfaceNode, position_meta_entry: i32) -> f32 {
    node.meta
        .entry(position_meta_entry)
        .and_then(MetaEntry::as_float2)
        .map(|[x, _]| x)
        .unwrap_or(node.id.get() as f32)
}

/// Walks the resolved graph from the root, assigning execution indices and state offsets and
/// wiring decorators and children.
///
/// Every node is compiled at most once per run. A reference to a node already compiled is
/// dropped; a reference to a node on the current path is a cycle and handled per
/// [`CyclePolicy`].
pub struct TreeCompiler<'a> {
    graph: &'a mut Graph<Option<NodeInstance>>,
    config: &'a CompilerConfig,
    trace: &'a mut dyn TraceSink,
    tick: u64,
    visited: Vec<bool>,
    on_path: Vec<bool>,
    tree: CompiledTree,
}

impl<'a> TreeCompiler<'a> {
    pub fn new(
        graph: &'a mut Graph<Option<NodeInstance>>,
        config: &'a CompilerConfig,
        trace: &'a mut dyn TraceSink,
    ) -> Self {
        let len = graph.len();
        Self {
            graph,
            config,
            trace,
            tick: 0,
            visited: vec![false; len],
            on_path: vec![false; len],
            tree: CompiledTree::default(),
        }
    }

    /// Tick stamped on emitted trace events.
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    /// Compile starting at `root`, which must hold a resolved instance.
    ///
    /// The walk keeps its own frame stack, so tree depth is bounded by memory rather than by
    /// the thread stack.
    pub fn compile(mut self, root: NodeHandle) -> Result<CompiledTree, LoadError> {
        let mut stack: Vec<Frame> = Vec::new();
        stack.extend(self.enter(root));

        while let Some(frame) = stack.last_mut() {
            let Some((link, to)) = frame.links.next() else {
                self.on_path[frame.handle.index()] = false;
                stack.pop();
                continue;
            };
            let (parent, from) = (frame.handle, frame.id);

            let accept: fn(&NodeInstance) -> bool = match link {
                Link::Decorator => NodeInstance::is_decorator,
                Link::Child => |_| true,
            };
            if let Some(target) = self.link_target(from, to, accept)? {
                self.attach(parent, target, link);
                stack.extend(self.enter(target));
            }
        }

        Ok(self.tree)
    }

    /// Assign the node its slot and collect its outgoing links: decorators in declared order,
    /// then children left to right.
    fn enter(&mut self, handle: NodeHandle) -> Option<Frame> {
        let i = handle.index();
        let entry = self.graph.get_mut(i)?;
        let instance = entry.payload.as_mut()?;

        let index = self.tree.nodes_count;
        instance.assign_slot(index, self.tree.nodes_states_size);
        self.tree.nodes_states_size += instance.state_size();
        self.tree.nodes_count += 1;

        tracing::debug!(
            node = %entry.node.id,
            type_name = instance.type_name(),
            index,
            offset = instance.memory_offset().unwrap_or(0),
            size = instance.state_size(),
            "compiled node"
        );
        self.trace.emit(
            TraceEvent::new(self.tick, "bt.compile.node")
                .with_a(entry.node.id.get() as u64)
                .with_b(index as u64),
        );

        let decorator_ids = if instance.is_decoratable() {
            entry
                .node
                .value(2)
                .and_then(Value::as_id_list)
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        let mut children = if instance.is_compound() {
            entry.node.connections(self.config.children_box).to_vec()
        } else {
            Vec::new()
        };
        let id = entry.node.id;

        self.visited[i] = true;
        self.on_path[i] = true;

        self.sort_children(&mut children);
        let links: Vec<(Link, NodeId)> = decorator_ids
            .into_iter()
            .map(|d| (Link::Decorator, d))
            .chain(children.into_iter().map(|c| (Link::Child, c.node)))
            .collect();

        Some(Frame {
            handle,
            id,
            links: links.into_iter(),
        })
    }

    /// Resolve a reference from `from` to `to`, or `None` when it must be dropped.
    fn link_target(
        &mut self,
        from: NodeId,
        to: NodeId,
        accept: fn(&NodeInstance) -> bool,
    ) -> Result<Option<NodeHandle>, LoadError> {
        let target = self.graph.index_of(to).filter(|&idx| {
            self.graph
                .get(idx)
                .and_then(|n| n.payload.as_ref())
                .is_some_and(accept)
        });
        let Some(idx) = target else {
            self.trace.emit(
                TraceEvent::new(self.tick, "bt.compile.skip")
                    .with_a(from.get() as u64)
                    .with_b(to.get() as u64),
            );
            return Ok(None);
        };

        if self.on_path[idx] {
            if self.config.cycle_policy == CyclePolicy::Fail {
                return Err(LoadError::Cycle { from, to });
            }
            tracing::warn!(from = %from, to = %to, "Cycle in behavior tree graph, dropping reference");
            self.trace.emit(
                TraceEvent::new(self.tick, "bt.compile.cycle")
                    .with_a(from.get() as u64)
                    .with_b(to.get() as u64),
            );
            return Ok(None);
        }

        if self.visited[idx] {
            tracing::warn!(from = %from, to = %to, "Node already has a parent, dropping reference");
            self.trace.emit(
                TraceEvent::new(self.tick, "bt.compile.shared")
                    .with_a(from.get() as u64)
                    .with_b(to.get() as u64),
            );
            return Ok(None);
        }

        Ok(Some(NodeHandle(idx)))
    }

    fn attach(&mut self, parent: NodeHandle, target: NodeHandle, link: Link) {
        if let Some(instance) = self.instance_mut(parent) {
            match link {
                Link::Decorator => instance.append_decorator(target),
                Link::Child => instance.append_child(target),
            }
        }
        if let Some(instance) = self.instance_mut(target) {
            instance.set_parent(parent);
        }
    }

    fn instance_mut(&mut self, handle: NodeHandle) -> Option<&mut NodeInstance> {
        self.graph.get_mut(handle.index())?.payload.as_mut()
    }

    fn sort_children(&self, children: &mut [Connection]) {
        let entry = self.config.position_meta_entry;
        let key = |c: &Connection| {
            self.graph
                .node(c.node)
                .map(|n| child_sort_key(&n.node, entry))
                .unwrap_or(c.node.get() as f32)
        };
        children.sort_by(|a, b| key(a).total_cmp(&key(b)).then_with(|| a.node.cmp(&b.node)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_graph::{NodeBuilder, NodeClass, POSITION_META_ENTRY};

    const CLASS: NodeClass = NodeClass::new(19, 1);

    #[test]
    fn sort_key_prefers_position_x() {
        let node = NodeBuilder::new(40, CLASS).position(-2.5, 8.0).build();
        assert_eq!(child_sort_key(&node, POSITION_META_ENTRY), -2.5);
    }

    #[test]
    fn sort_key_falls_back_to_id() {
        let bare = NodeBuilder::new(40, CLASS).build();
        assert_eq!(child_sort_key(&bare, POSITION_META_ENTRY), 40.0);

        let empty = NodeBuilder::new(41, CLASS)
            .meta(MetaEntry::new(POSITION_META_ENTRY, Vec::new()))
            .build();
        assert_eq!(child_sort_key(&empty, POSITION_META_ENTRY), 41.0);
    }
}
