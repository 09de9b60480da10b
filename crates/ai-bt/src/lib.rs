//! Behavior Tree graph compiler built on `ai-graph`.
//!
//! Loading a [`BehaviorTreeGraph`] materializes the surface nodes, resolves each AI node into a
//! typed [`NodeInstance`] through an injected [`TypeRegistry`], hydrates its parameters, and then
//! compiles the tree reachable from the root: preorder execution indices, a packed state-memory
//! layout, parent back-references, decorators in declared order and children ordered left to
//! right by their placement on the surface.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod hydrate;
pub mod layout;
pub mod node;
pub mod nodes;
pub mod registry;
pub mod resolver;

pub use compiler::{child_sort_key, CompiledTree, TreeCompiler};
pub use config::{CompilerConfig, CyclePolicy};
pub use error::{ConfigError, LoadError};
pub use graph::{BehaviorTreeGraph, BehaviorTreeGraphNode, LoadContext};
pub use hydrate::{overlay_params, HydrationError, Hydrator, JsonHydrator};
pub use layout::{NodeLayout, TreeLayout};
pub use node::{BehaviorTreeNode, NodeHandle, NodeInstance, NodeKind, NodeType};
pub use registry::{NodeTypeRegistry, TypeHandle, TypeRegistry};
pub use resolver::NodeResolver;
