// SPDX-License-Identifier: MIT OR Apache-2.0
//! Concrete logic nodes and the registry used to place them.

pub mod flow_control;

use crate::logic::LogicNode;
use indexmap::IndexMap;

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Entry and exit points of a flow
    Route,
    /// Branching and sequencing
    Flow,
    /// Boolean combination of signals
    Logic,
    /// Time-based nodes
    Time,
    /// Nested flows
    Graph,
}

/// Registered logic node type
#[derive(Debug, Clone)]
pub struct NodeTypeInfo {
    /// Unique type identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Category
    pub category: NodeCategory,
    /// Creates a fresh instance
    pub factory: fn() -> Box<dyn LogicNode>,
}

/// Registry of placeable logic node types
pub struct LogicNodeRegistry {
    types: IndexMap<&'static str, NodeTypeInfo>,
}

impl LogicNodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Registry with every built-in node
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        flow_control::register(&mut registry);
        registry
    }

    /// Register a node type
    pub fn register(&mut self, info: NodeTypeInfo) {
        self.types.insert(info.id, info);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeTypeInfo> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeTypeInfo> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeTypeInfo> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Instantiate a logic node by type ID
    pub fn create(&self, id: &str) -> Option<Box<dyn LogicNode>> {
        self.get(id).map(|info| (info.factory)())
    }
}

impl Default for LogicNodeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_create_matching_types() {
        let registry = LogicNodeRegistry::with_builtins();
        for info in registry.types() {
            let node = registry.create(info.id).unwrap();
            assert_eq!(node.type_name(), info.id);
        }
        assert!(registry.create("missing").is_none());
        assert_eq!(registry.types_in_category(NodeCategory::Route).count(), 2);
    }
}
