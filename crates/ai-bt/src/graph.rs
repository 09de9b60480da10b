use std::collections::BTreeSet;

use ai_graph::{Graph, GraphNode, NodeId, Value};
use ai_tools::{NullTraceSink, TraceEvent, TraceSink};

use crate::compiler::TreeCompiler;
use crate::config::CompilerConfig;
use crate::error::LoadError;
use crate::hydrate::{Hydrator, JsonHydrator};
use crate::layout::{NodeLayout, TreeLayout};
use crate::node::{NodeHandle, NodeInstance};
use crate::registry::TypeRegistry;
use crate::resolver::NodeResolver;

/// A surface node together with the instance it owns (if its type resolved).
pub type BehaviorTreeGraphNode = GraphNode<Option<NodeInstance>>;

/// Collaborators used by [`BehaviorTreeGraph::load`].
pub struct LoadContext<'a> {
    registry: &'a dyn TypeRegistry,
    hydrator: &'a dyn Hydrator,
    config: CompilerConfig,
    trace: Option<&'a mut dyn TraceSink>,
}

impl<'a> LoadContext<'a> {
    pub fn new(registry: &'a dyn TypeRegistry) -> Self {
        Self {
            registry,
            hydrator: &JsonHydrator,
            config: CompilerConfig::default(),
            trace: None,
        }
    }

    pub fn with_hydrator(mut self, hydrator: &'a dyn Hydrator) -> Self {
        self.hydrator = hydrator;
        self
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_trace(mut self, trace: &'a mut dyn TraceSink) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }
}

/// A behavior tree surface compiled into a rooted node hierarchy with a packed state layout.
///
/// Offsets and indices are only meaningful for the load that produced them; every load
/// recomputes them from scratch.
#[derive(Debug, Default)]
pub struct BehaviorTreeGraph {
    graph: Graph<Option<NodeInstance>>,
    root: Option<NodeHandle>,
    nodes_count: usize,
    nodes_states_size: usize,
    generation: u64,
}

impl BehaviorTreeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a surface and compile the tree under its root.
    ///
    /// Any previously loaded content is cleared first. On error the graph is left empty.
    pub fn load(&mut self, bytes: &[u8], ctx: &mut LoadContext<'_>) -> Result<(), LoadError> {
        self.clear();
        self.generation = self.generation.wrapping_add(1);
        let tick = self.generation;

        let mut null_sink = NullTraceSink;
        let trace: &mut dyn TraceSink = match ctx.trace.as_deref_mut() {
            Some(sink) => sink,
            None => &mut null_sink,
        };
        let config = &ctx.config;
        let resolver = NodeResolver::new(ctx.registry, ctx.hydrator, config);

        let mut root = None;
        let mut index = 0usize;
        let loaded = Graph::load(bytes, config.load_meta, |node| {
            let instance = resolver.resolve(node, &mut *trace, tick);
            if root.is_none() && instance.as_ref().is_some_and(|i| i.kind().is_root()) {
                root = Some(NodeHandle(index));
            }
            index += 1;
            instance
        });
        self.graph = match loaded {
            Ok(graph) => graph,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load graph");
                return Err(err.into());
            }
        };

        let Some(root) = root else {
            tracing::warn!(nodes = self.graph.len(), "Behavior tree graph has no root node");
            trace.emit(TraceEvent::new(tick, "bt.load.no_root"));
            if config.require_root {
                self.clear();
                return Err(LoadError::NoRoot);
            }
            return Ok(());
        };

        let compiled = TreeCompiler::new(&mut self.graph, config, trace)
            .with_tick(tick)
            .compile(root);
        match compiled {
            Ok(tree) => {
                self.root = Some(root);
                self.nodes_count = tree.nodes_count;
                self.nodes_states_size = tree.nodes_states_size;
                tracing::debug!(
                    nodes = tree.nodes_count,
                    states_size = tree.nodes_states_size,
                    "behavior tree compiled"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to compile behavior tree");
                self.clear();
                Err(err)
            }
        }
    }

    /// Release every node instance and reset the compiled state.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.root = None;
        self.nodes_count = 0;
        self.nodes_states_size = 0;
    }

    pub fn root(&self) -> Option<&NodeInstance> {
        self.root.and_then(|h| self.instance(h))
    }

    pub fn root_handle(&self) -> Option<NodeHandle> {
        self.root
    }

    /// Number of compiled nodes.
    pub fn nodes_count(&self) -> usize {
        self.nodes_count
    }

    /// Total bytes of runtime state of all compiled nodes.
    pub fn nodes_states_size(&self) -> usize {
        self.nodes_states_size
    }

    pub fn nodes(&self) -> &[BehaviorTreeGraphNode] {
        self.graph.nodes()
    }

    pub fn node(&self, id: NodeId) -> Option<&BehaviorTreeGraphNode> {
        self.graph.node(id)
    }

    pub fn handle_of(&self, id: NodeId) -> Option<NodeHandle> {
        self.graph.index_of(id).map(NodeHandle)
    }

    pub fn node_id(&self, handle: NodeHandle) -> Option<NodeId> {
        self.graph.get(handle.index()).map(|n| n.node.id)
    }

    pub fn instance(&self, handle: NodeHandle) -> Option<&NodeInstance> {
        self.graph.get(handle.index())?.payload.as_ref()
    }

    pub fn instance_by_id(&self, id: NodeId) -> Option<&NodeInstance> {
        self.node(id)?.payload.as_ref()
    }

    /// Compiled nodes in execution order.
    pub fn iter_compiled(&self) -> impl Iterator<Item = (&BehaviorTreeGraphNode, &NodeInstance)> {
        let mut compiled: Vec<_> = self
            .graph
            .nodes()
            .iter()
            .filter_map(|n| n.payload.as_ref().filter(|i| i.is_compiled()).map(|i| (n, i)))
            .collect();
        compiled.sort_by_key(|(_, i)| i.execution_index());
        compiled.into_iter()
    }

    /// Serializable description of the compiled tree.
    pub fn layout(&self) -> TreeLayout {
        let id_of = |h: NodeHandle| self.node_id(h).map(NodeId::get);
        let nodes = self
            .iter_compiled()
            .map(|(node, instance)| NodeLayout {
                id: node.node.id.get(),
                type_name: instance.type_name().to_string(),
                kind: instance.kind(),
                execution_index: instance.execution_index().unwrap_or_default(),
                memory_offset: instance.memory_offset().unwrap_or_default(),
                state_size: instance.state_size(),
                parent: instance.parent().and_then(id_of),
                decorators: instance.decorators().iter().filter_map(|&h| id_of(h)).collect(),
                children: instance.children().iter().filter_map(|&h| id_of(h)).collect(),
            })
            .collect();
        TreeLayout {
            nodes_count: self.nodes_count,
            nodes_states_size: self.nodes_states_size,
            nodes,
        }
    }

    /// Asset ids referenced from node parameters, sorted and de-duplicated.
    ///
    /// Every string value in a resolved node's parameter blob that looks like a GUID (32 hex
    /// digits, optionally dash-separated) is reported in lowercase hex without dashes.
    pub fn asset_references(&self) -> Vec<String> {
        let mut refs = BTreeSet::new();
        for node in self.graph.nodes() {
            if node.payload.is_none() {
                continue;
            }
            let Some(blob) = node.node.value(1).and_then(Value::as_blob) else {
                continue;
            };
            if let Ok(params) = serde_json::from_slice::<serde_json::Value>(blob) {
                collect_guids(&params, &mut refs);
            }
        }
        refs.into_iter().collect()
    }
}

fn collect_guids(value: &serde_json::Value, out: &mut BTreeSet<String>) {
    match value {
        serde_json::Value::String(s) => {
            if let Some(guid) = parse_guid(s) {
                out.insert(guid);
            }
        }
        serde_json::Value::Array(items) => items.iter().for_each(|v| collect_guids(v, out)),
        serde_json::Value::Object(fields) => fields.values().for_each(|v| collect_guids(v, out)),
        _ => {}
    }
}

fn parse_guid(s: &str) -> Option<String> {
    let plain = match s.len() {
        32 => s.to_string(),
        36 => {
            let dashes = [8, 13, 18, 23];
            if !dashes.iter().all(|&i| s.as_bytes()[i] == b'-') {
                return None;
            }
            s.replace('-', "")
        }
        _ => return None,
    };
    if plain.len() == 32 && plain.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(plain.to_ascii_lowercase())
    } else {
        None
    }
}
