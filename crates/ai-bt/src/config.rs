//! Compiler configuration.

use std::path::Path;

use ai_graph::{NodeClass, POSITION_META_ENTRY};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What to do when a reference points back at a node on the current compile path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Drop the offending reference and keep compiling.
    #[default]
    Truncate,
    /// Fail the whole load.
    Fail,
}

/// Settings for loading and compiling a behavior tree surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Surface group holding AI nodes
    pub ai_group_id: u16,

    /// Type ids within the group that carry a node instance
    pub instance_type_ids: Vec<u16>,

    /// Output box listing a compound's children
    pub children_box: u8,

    /// Meta entry holding node placement, used to order children
    pub position_meta_entry: i32,

    /// Keep layout metadata when loading
    pub load_meta: bool,

    pub cycle_policy: CyclePolicy,

    /// Treat a surface without a root node as a load failure
    pub require_root: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            ai_group_id: 19,
            instance_type_ids: vec![1, 2, 3],
            children_box: 1,
            position_meta_entry: POSITION_META_ENTRY,
            load_meta: true,
            cycle_policy: CyclePolicy::Truncate,
            require_root: false,
        }
    }
}

impl CompilerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from `path` when it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Whether nodes of this class get a node instance.
    pub fn is_ai_node(&self, class: NodeClass) -> bool {
        class.group_id == self.ai_group_id && self.instance_type_ids.contains(&class.type_id)
    }
}
