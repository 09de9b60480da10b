use ai_graph::{SurfaceNode, Value};
use ai_tools::{TraceEvent, TraceSink};

use crate::config::CompilerConfig;
use crate::hydrate::Hydrator;
use crate::node::NodeInstance;
use crate::registry::{TypeHandle, TypeRegistry};

/// Turns classified surface nodes into live node instances.
pub struct NodeResolver<'a> {
    registry: &'a dyn TypeRegistry,
    hydrator: &'a dyn Hydrator,
    config: &'a CompilerConfig,
}

impl<'a> NodeResolver<'a> {
    pub fn new(
        registry: &'a dyn TypeRegistry,
        hydrator: &'a dyn Hydrator,
        config: &'a CompilerConfig,
    ) -> Self {
        Self {
            registry,
            hydrator,
            config,
        }
    }

    /// Resolve the type named by the node's first value: compact text first, then wide text.
    pub fn resolve_type(&self, node: &SurfaceNode) -> Option<TypeHandle> {
        let name = node.value(0)?;
        name.as_ansi_str()
            .and_then(|s| self.registry.resolve(s))
            .or_else(|| {
                name.as_wide_string()
                    .and_then(|s| self.registry.resolve(&s))
            })
    }

    /// Create the instance for `node`, or `None` when the node is not an AI node or its type is
    /// unknown. Parameter hydration failures are logged and leave defaults in place.
    pub fn resolve(
        &self,
        node: &SurfaceNode,
        trace: &mut dyn TraceSink,
        tick: u64,
    ) -> Option<NodeInstance> {
        if !self.config.is_ai_node(node.class) {
            return None;
        }

        let Some(handle) = self.resolve_type(node) else {
            let name = node.value(0).map(type_name_text).unwrap_or_default();
            if !name.is_empty() {
                tracing::error!(node = %node.id, "Missing type '{}'", name);
                trace.emit(
                    TraceEvent::new(tick, "bt.load.missing_type").with_a(node.id.get() as u64),
                );
            }
            return None;
        };

        let mut instance = self.registry.instantiate(&handle);
        if let Some(blob) = node.value(1).and_then(Value::as_blob) {
            if let Err(err) = self.hydrator.hydrate(instance.as_mut(), blob) {
                tracing::warn!(
                    node = %node.id,
                    type_name = handle.name(),
                    error = %err,
                    "Failed to load node parameters"
                );
                trace.emit(
                    TraceEvent::new(tick, "bt.load.hydration_failed").with_a(node.id.get() as u64),
                );
            }
        }

        Some(NodeInstance::new(instance))
    }
}

fn type_name_text(value: &Value) -> String {
    value
        .as_ansi_str()
        .filter(|s| !s.contains('\0'))
        .map(str::to_string)
        .or_else(|| value.as_wide_string())
        .unwrap_or_else(|| value.to_text())
        .trim()
        .to_string()
}
