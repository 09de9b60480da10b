use crate::{
    Connection, GraphBox, MetaEntry, NodeClass, NodeId, SurfaceDocument, SurfaceError,
    SurfaceNode, Value,
};

/// Fluent construction of a single surface node.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: SurfaceNode,
}

impl NodeBuilder {
    pub fn new(id: u32, class: NodeClass) -> Self {
        Self {
            node: SurfaceNode::new(NodeId(id), class),
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.node.values.push(value.into());
        self
    }

    pub fn values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.node.values.extend(values);
        self
    }

    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.node.meta.set(MetaEntry::float2(x, y));
        self
    }

    pub fn meta(mut self, entry: MetaEntry) -> Self {
        self.node.meta.set(entry);
        self
    }

    /// Append a connection from output box `box_id` to `target`.
    pub fn connect(mut self, box_id: u8, target: u32) -> Self {
        let connection = Connection::new(NodeId(target), 0);
        match self.node.boxes.iter_mut().find(|b| b.id == box_id) {
            Some(b) => b.connections.push(connection),
            None => self.node.boxes.push(GraphBox {
                id: box_id,
                connections: vec![connection],
            }),
        }
        self
    }

    pub fn build(self) -> SurfaceNode {
        self.node
    }
}

impl From<NodeBuilder> for SurfaceNode {
    fn from(builder: NodeBuilder) -> Self {
        builder.build()
    }
}

/// Fluent construction of a surface document.
#[derive(Debug, Clone, Default)]
pub struct SurfaceBuilder {
    doc: SurfaceDocument,
}

impl SurfaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, node: impl Into<SurfaceNode>) -> Self {
        self.doc.nodes.push(node.into());
        self
    }

    pub fn document(self) -> SurfaceDocument {
        self.doc
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SurfaceError> {
        self.doc.to_bytes()
    }
}
