use std::collections::HashMap;

use crate::{NodeId, SurfaceDocument, SurfaceError, SurfaceNode};

/// A materialized surface node plus the consumer-owned payload created for it at load time.
#[derive(Debug)]
pub struct GraphNode<P> {
    pub node: SurfaceNode,
    pub payload: P,
}

/// Ordered node list with an id index.
///
/// Node order is the document order and never changes after load; indices into [`Graph::nodes`]
/// are therefore stable handles for the lifetime of one load.
#[derive(Debug)]
pub struct Graph<P> {
    nodes: Vec<GraphNode<P>>,
    index: HashMap<NodeId, usize>,
}

impl<P> Default for Graph<P> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<P> Graph<P> {
    /// Decode a surface and materialize its nodes.
    ///
    /// `on_node_loaded` runs once per node, in document order, after the node is fully decoded;
    /// its result becomes the node payload. When `load_meta` is false all layout metadata is
    /// discarded. Any decoding failure fails the whole load and no hook is invoked.
    pub fn load<F>(bytes: &[u8], load_meta: bool, mut on_node_loaded: F) -> Result<Self, SurfaceError>
    where
        F: FnMut(&SurfaceNode) -> P,
    {
        let doc = SurfaceDocument::from_bytes(bytes)?;

        let mut index = HashMap::with_capacity(doc.nodes.len());
        for (i, node) in doc.nodes.iter().enumerate() {
            if index.insert(node.id, i).is_some() {
                return Err(SurfaceError::DuplicateNode(node.id));
            }
        }

        let nodes = doc
            .nodes
            .into_iter()
            .map(|mut node| {
                if !load_meta {
                    node.meta.clear();
                }
                let payload = on_node_loaded(&node);
                GraphNode { node, payload }
            })
            .collect::<Vec<_>>();

        tracing::trace!(nodes = nodes.len(), "surface loaded");
        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[GraphNode<P>] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [GraphNode<P>] {
        &mut self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&GraphNode<P>> {
        self.nodes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut GraphNode<P>> {
        self.nodes.get_mut(index)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode<P>> {
        self.index_of(id).and_then(|i| self.nodes.get(i))
    }

    /// Drop every node and its payload.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }
}
