//! Built-in node catalog.
//!
//! Each node declares its parameters (hydrated from the surface) and the runtime state it needs
//! in the tree's state blob. Executing the nodes is the job of the runtime, not of this crate.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::hydrate::overlay_params;
use crate::node::{BehaviorTreeNode, NodeKind, NodeType};

macro_rules! behavior_tree_node {
    ($ty:ident, $kind:expr, state = $state:ty) => {
        impl NodeType for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);
            const KIND: NodeKind = $kind;
        }

        impl BehaviorTreeNode for $ty {
            fn type_name(&self) -> &'static str {
                <Self as NodeType>::TYPE_NAME
            }

            fn kind(&self) -> NodeKind {
                <Self as NodeType>::KIND
            }

            fn state_size(&self) -> usize {
                std::mem::size_of::<$state>()
            }

            fn load_params(&mut self, params: &serde_json::Value) -> Result<(), serde_json::Error> {
                overlay_params(self, params)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

/// State of nodes that run their children one after another.
#[repr(C)]
pub struct CompoundState {
    pub current_child_index: i32,
}

#[repr(C)]
pub struct TimerState {
    pub time: f32,
}

#[repr(C)]
pub struct LoopState {
    pub loops_left: i32,
}

#[repr(C)]
pub struct SubTreeState {
    pub nodes_count: u32,
    pub states_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeRootNode {
    /// Type name of the blackboard the tree runs against (empty for none).
    pub blackboard_type: String,
    pub update_fps: f32,
    pub scaled_time: bool,
}

impl Default for BehaviorTreeRootNode {
    fn default() -> Self {
        Self {
            blackboard_type: String::new(),
            update_fps: 10.0,
            scaled_time: true,
        }
    }
}

behavior_tree_node!(BehaviorTreeRootNode, NodeKind::Root, state = CompoundState);

/// Runs children until one fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeSequenceNode {}

behavior_tree_node!(BehaviorTreeSequenceNode, NodeKind::Compound, state = CompoundState);

/// Runs children until one succeeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeSelectorNode {}

behavior_tree_node!(BehaviorTreeSelectorNode, NodeKind::Compound, state = CompoundState);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeDelayNode {
    /// Seconds to wait.
    pub wait_time: f32,
    pub random_deviation: f32,
}

impl Default for BehaviorTreeDelayNode {
    fn default() -> Self {
        Self {
            wait_time: 3.0,
            random_deviation: 0.0,
        }
    }
}

behavior_tree_node!(BehaviorTreeDelayNode, NodeKind::Task, state = TimerState);

/// Runs another behavior tree asset, referenced by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeSubTreeNode {
    pub tree: Option<String>,
}

behavior_tree_node!(BehaviorTreeSubTreeNode, NodeKind::Task, state = SubTreeState);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeInvertDecorator {}

behavior_tree_node!(BehaviorTreeInvertDecorator, NodeKind::Decorator, state = ());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeForceSuccessDecorator {}

behavior_tree_node!(BehaviorTreeForceSuccessDecorator, NodeKind::Decorator, state = ());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeForceFailedDecorator {}

behavior_tree_node!(BehaviorTreeForceFailedDecorator, NodeKind::Decorator, state = ());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeLoopDecorator {
    pub loop_count: i32,
    /// Ignore `loop_count` and repeat until the decorated node fails.
    pub infinite: bool,
}

impl Default for BehaviorTreeLoopDecorator {
    fn default() -> Self {
        Self {
            loop_count: 3,
            infinite: false,
        }
    }
}

behavior_tree_node!(BehaviorTreeLoopDecorator, NodeKind::Decorator, state = LoopState);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeTimeLimitDecorator {
    pub max_duration: f32,
    pub random_deviation: f32,
}

impl Default for BehaviorTreeTimeLimitDecorator {
    fn default() -> Self {
        Self {
            max_duration: 3.0,
            random_deviation: 0.0,
        }
    }
}

behavior_tree_node!(BehaviorTreeTimeLimitDecorator, NodeKind::Decorator, state = TimerState);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BehaviorTreeCooldownDecorator {
    pub min_duration: f32,
    pub random_deviation: f32,
}

impl Default for BehaviorTreeCooldownDecorator {
    fn default() -> Self {
        Self {
            min_duration: 3.0,
            random_deviation: 0.0,
        }
    }
}

behavior_tree_node!(BehaviorTreeCooldownDecorator, NodeKind::Decorator, state = TimerState);
