// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the flow asset.

use crate::node::NodeId;
use crate::pin::{PinDirection, PinId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A connection from an output pin to an input pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Source node ID
    pub from_node: NodeId,
    /// Source output pin
    pub from_pin: PinId,
    /// Target node ID
    pub to_node: NodeId,
    /// Target input pin
    pub to_pin: PinId,
}

impl Connection {
    /// Link `from_pin` on `from_node` to `to_pin` on `to_node`
    pub fn new(from_node: NodeId, from_pin: PinId, to_node: NodeId, to_pin: PinId) -> Self {
        Self {
            id: ConnectionId::new(),
            from_node,
            from_pin,
            to_node,
            to_pin,
        }
    }

    /// The node and pin on one end of the connection
    pub fn endpoint(&self, direction: PinDirection) -> (NodeId, PinId) {
        match direction {
            PinDirection::Output => (self.from_node, self.from_pin),
            PinDirection::Input => (self.to_node, self.to_pin),
        }
    }

    fn endpoints(&self) -> [(NodeId, PinId); 2] {
        [self.endpoint(PinDirection::Output), self.endpoint(PinDirection::Input)]
    }

    /// Whether either end sits on `node_id`
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.endpoints().iter().any(|(node, _)| *node == node_id)
    }

    /// Whether either end is `pin_id`
    pub fn involves_pin(&self, pin_id: PinId) -> bool {
        self.endpoints().iter().any(|(_, pin)| *pin == pin_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_follow_direction() {
        let (a, b) = (NodeId::new(), NodeId::new());
        let (out, input) = (PinId::new(), PinId::new());
        let connection = Connection::new(a, out, b, input);

        assert_eq!(connection.endpoint(PinDirection::Output), (a, out));
        assert_eq!(connection.endpoint(PinDirection::Input), (b, input));
        assert!(connection.involves_node(b));
        assert!(connection.involves_pin(out));
        assert!(!connection.involves_pin(PinId::new()));
    }
}
