//! Generic node-graph surface substrate.
//!
//! A surface is the serialized form of a visually-edited graph: an ordered list of nodes, each
//! with classification codes, raw parameter values, output boxes carrying connections, and
//! optional layout metadata. This crate knows nothing about what the nodes mean; consumers
//! attach their own per-node payload while the graph is materialized (see [`Graph::load`]).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod builder;
pub mod graph;
pub mod meta;
pub mod node;
pub mod surface;
pub mod value;

pub use builder::{NodeBuilder, SurfaceBuilder};
pub use graph::{Graph, GraphNode};
pub use meta::{Meta, MetaEntry, POSITION_META_ENTRY};
pub use node::{Connection, GraphBox, NodeClass, NodeId, SurfaceNode};
pub use surface::{SurfaceDocument, SurfaceError, SURFACE_VERSION};
pub use value::Value;
