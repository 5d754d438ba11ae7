// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flow asset containing editor nodes and the connections between them.

use crate::connection::{Connection, ConnectionId};
use crate::logic::LogicNode;
use crate::node::{EditorNode, NodeId};
use crate::pin::{PinDirection, PinId};
use crate::session::{ListenerHandle, SessionController, SessionEventBus};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a flow asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub Uuid);

impl AssetId {
    /// Create a new random asset ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to an editor node.
///
/// Pin edits and their breakpoint reindexing happen under one lock.
pub type NodeHandle = Arc<Mutex<EditorNode>>;

/// Nodes copied out of an asset
#[derive(Debug, Default)]
pub struct Clipboard {
    nodes: Vec<EditorNode>,
}

impl Clipboard {
    /// Number of copied nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was copied
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A flow graph asset
#[derive(Debug)]
pub struct FlowAsset {
    id: AssetId,
    /// Asset name
    pub name: String,
    nodes: IndexMap<NodeId, NodeHandle>,
    connections: IndexMap<ConnectionId, Connection>,
    events: Option<Arc<SessionEventBus>>,
}

impl FlowAsset {
    /// Create a new empty asset
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AssetId::new(),
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
            events: None,
        }
    }

    /// Asset ID
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Subscribe every node, now and later, to a session's lifecycle events
    pub fn attach_session(&mut self, events: &Arc<SessionEventBus>) {
        for handle in self.nodes.values() {
            subscribe(events, handle);
        }
        self.events = Some(Arc::clone(events));
    }

    /// Drop every node's lifecycle subscription
    pub fn detach_session(&mut self) {
        for handle in self.nodes.values() {
            handle.lock().set_subscription(None);
        }
        self.events = None;
    }

    /// Place a new node bound to `logic`
    pub fn place_node(&mut self, logic: Box<dyn LogicNode>) -> NodeId {
        self.add_node(EditorNode::new(logic))
    }

    /// Add an existing node, taking ownership of its logic node
    pub fn add_node(&mut self, mut node: EditorNode) -> NodeId {
        node.set_asset(Some(self.id));
        node.reset_ownership();
        let id = node.id();
        let handle = Arc::new(Mutex::new(node));
        if let Some(events) = &self.events {
            subscribe(events, &handle);
        }
        self.nodes.insert(id, handle);
        id
    }

    /// Remove a node and its connections, releasing its logic node
    pub fn remove_node(&mut self, node_id: NodeId) -> bool {
        let Some(handle) = self.nodes.shift_remove(&node_id) else {
            return false;
        };
        self.connections.retain(|_, c| !c.involves_node(node_id));
        {
            let mut node = handle.lock();
            node.set_subscription(None);
            node.set_asset(None);
        }
        tracing::debug!("Removed node {:?} from {}", node_id, self.name);
        true
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&NodeHandle> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &NodeHandle> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn handle(&self, node_id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&node_id).ok_or(GraphError::NodeNotFound(node_id))
    }

    // Duplication, copy and load

    /// Duplicate a node within this asset
    pub fn duplicate_node(&mut self, node_id: NodeId) -> Result<NodeId, GraphError> {
        let copy = self.handle(node_id)?.lock().duplicate();
        let id = self.add_node(copy);
        if let Some(handle) = self.nodes.get(&id) {
            handle.lock().post_duplicate();
        }
        Ok(id)
    }

    /// Copy nodes to a clipboard. Unknown IDs are skipped.
    pub fn copy_nodes(&self, node_ids: &[NodeId]) -> Clipboard {
        let nodes = node_ids
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|handle| {
                let mut copy = handle.lock().duplicate();
                copy.prepare_for_copying();
                copy
            })
            .collect();
        Clipboard { nodes }
    }

    /// Paste clipboard nodes into this asset, returning their new IDs
    pub fn paste(&mut self, clipboard: &Clipboard) -> Vec<NodeId> {
        let ids: Vec<NodeId> = clipboard
            .nodes
            .iter()
            .map(|node| self.add_node(node.duplicate()))
            .collect();
        for id in &ids {
            if let Some(handle) = self.nodes.get(id) {
                handle.lock().post_paste();
            }
        }
        tracing::info!("Pasted {} nodes into {}", ids.len(), self.name);
        ids
    }

    /// Repair node ownership after the asset was loaded
    pub fn post_load(&mut self) {
        for handle in self.nodes.values() {
            let mut node = handle.lock();
            node.set_asset(Some(self.id));
            node.post_load();
        }
    }

    // Pins

    /// Append an author pin to a node
    pub fn add_user_pin(
        &mut self,
        node_id: NodeId,
        direction: PinDirection,
    ) -> Result<Option<usize>, GraphError> {
        Ok(self.handle(node_id)?.lock().add_user_pin(direction))
    }

    /// Remove an author pin and every connection to it
    pub fn remove_user_pin(&mut self, node_id: NodeId, pin: PinId) -> Result<bool, GraphError> {
        let removed = self.handle(node_id)?.lock().remove_user_pin(pin);
        if removed.is_none() {
            return Ok(false);
        }
        self.connections.retain(|_, c| !c.involves_pin(pin));
        Ok(true)
    }

    /// Rebuild a node's pins from its logic node, dropping connections to vanished pins
    pub fn reconstruct_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let removed = self.handle(node_id)?.lock().reconstruct();
        for pin in removed {
            self.connections.retain(|_, c| !c.involves_pin(pin.id));
        }
        Ok(())
    }

    // Connections

    /// Connect an output pin to an input pin
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_pin: PinId,
        to_node: NodeId,
        to_pin: PinId,
    ) -> Result<ConnectionId, GraphError> {
        let (from_dir, _) = self
            .handle(from_node)?
            .lock()
            .find_pin(from_pin)
            .ok_or(GraphError::PinNotFound(from_pin))?;
        let (to_dir, _) = self
            .handle(to_node)?
            .lock()
            .find_pin(to_pin)
            .ok_or(GraphError::PinNotFound(to_pin))?;

        if from_dir != PinDirection::Output || to_dir != PinDirection::Input {
            return Err(GraphError::IncompatiblePins);
        }

        if from_node == to_node {
            return Err(GraphError::SelfLoop);
        }

        // An output fires exactly one input
        if self.connections.values().any(|c| c.from_pin == from_pin) {
            return Err(GraphError::PinAlreadyConnected(from_pin));
        }

        let connection = Connection::new(from_node, from_pin, to_node, to_pin);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Wire a freshly placed node to the pin it was spawned from.
    ///
    /// Uses the new node's first pin facing `from_pin`. An output that is
    /// already linked gets the new node inserted into that link. Returns
    /// false when the new node has no suitable pin.
    pub fn autowire_new_node(
        &mut self,
        node_id: NodeId,
        from_node: NodeId,
        from_pin: PinId,
    ) -> Result<bool, GraphError> {
        let (from_dir, _) = self
            .handle(from_node)?
            .lock()
            .find_pin(from_pin)
            .ok_or(GraphError::PinNotFound(from_pin))?;
        let facing = match from_dir {
            PinDirection::Output => PinDirection::Input,
            PinDirection::Input => PinDirection::Output,
        };
        let new_pin = self.handle(node_id)?.lock().pin(facing, 0).map(|p| p.id);
        let Some(new_pin) = new_pin else {
            return Ok(false);
        };

        match from_dir {
            PinDirection::Output if self.connections_for_pin(from_pin).next().is_some() => {
                self.insert_node(from_node, from_pin, node_id, new_pin)?;
            }
            PinDirection::Output => {
                self.connect(from_node, from_pin, node_id, new_pin)?;
            }
            PinDirection::Input => {
                self.connect(node_id, new_pin, from_node, from_pin)?;
            }
        }
        tracing::debug!("Autowired {:?} to {:?}", node_id, from_node);
        Ok(true)
    }

    /// Splice a node into the link leaving `from_pin`.
    ///
    /// `from_pin` is relinked to `new_link_pin` on the node, and the node's
    /// first output takes over the previous targets. Nothing changes on error.
    pub fn insert_node(
        &mut self,
        from_node: NodeId,
        from_pin: PinId,
        node_id: NodeId,
        new_link_pin: PinId,
    ) -> Result<(), GraphError> {
        let out_pin = self.handle(node_id)?.lock().pin(PinDirection::Output, 0).map(|p| p.id);
        let previous: Vec<Connection> = self
            .connections
            .values()
            .filter(|c| c.from_pin == from_pin)
            .cloned()
            .collect();
        for connection in &previous {
            self.connections.shift_remove(&connection.id);
        }

        let mut added = Vec::new();
        let result = self.connect(from_node, from_pin, node_id, new_link_pin).and_then(|id| {
            added.push(id);
            let Some(out_pin) = out_pin else {
                return Ok(());
            };
            for connection in &previous {
                let (to_node, to_pin) = connection.endpoint(PinDirection::Input);
                added.push(self.connect(node_id, out_pin, to_node, to_pin)?);
            }
            Ok(())
        });

        if result.is_err() {
            for id in added {
                self.connections.shift_remove(&id);
            }
            for connection in previous {
                self.connections.insert(connection.id, connection);
            }
        }
        result
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections involving a pin
    pub fn connections_for_pin(&self, pin: PinId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_pin(pin))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // Session

    /// Route a pin trigger from the running session to its node
    pub fn trigger(
        &self,
        node_id: NodeId,
        direction: PinDirection,
        index: usize,
        session: &mut dyn SessionController,
    ) -> Result<(), GraphError> {
        self.handle(node_id)?
            .lock()
            .on_pin_triggered(direction, index, session);
        Ok(())
    }
}

impl Default for FlowAsset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

fn subscribe(events: &Arc<SessionEventBus>, handle: &NodeHandle) {
    let listener: ListenerHandle = handle.clone();
    let subscription = events.subscribe(&listener);
    handle.lock().set_subscription(Some(subscription));
}

/// Errors from asset edits
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Pin not found on the given node
    #[error("Pin not found: {0:?}")]
    PinNotFound(PinId),

    /// Connections must run from an output to an input
    #[error("Incompatible pins")]
    IncompatiblePins,

    /// Output pin is already connected
    #[error("Pin already connected: {0:?}")]
    PinAlreadyConnected(PinId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}
