// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor-side graph node bound to a logic node.
//!
//! An [`EditorNode`] owns exactly one logic node, its input and output pins,
//! and the breakpoints placed on the node and its pins. Session handling
//! lives in [`crate::bridge`].

use crate::asset::AssetId;
use crate::breakpoint::BreakpointFlags;
use crate::logic::{ActivationState, LogicNode, Outer, OwnedLogicNode};
use crate::pin::{Pin, PinDirection, PinId, PinKind, PinSide};
use crate::session::Subscription;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the flow editor graph
#[derive(Debug)]
pub struct EditorNode {
    id: NodeId,
    logic: OwnedLogicNode,
    /// Asset containing this node, if placed
    asset: Option<AssetId>,
    pub(crate) inputs: PinSide,
    pub(crate) outputs: PinSide,
    pub(crate) node_breakpoint: BreakpointFlags,
    subscription: Option<Subscription>,
}

impl EditorNode {
    /// Bind a new editor node to `logic` and create its default pins
    pub fn new(logic: Box<dyn LogicNode>) -> Self {
        let mut node = Self {
            id: NodeId::new(),
            logic: OwnedLogicNode::new(logic),
            asset: None,
            inputs: PinSide::new(),
            outputs: PinSide::new(),
            node_breakpoint: BreakpointFlags::new(),
            subscription: None,
        };
        node.allocate_default_pins();
        node
    }

    /// Node ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Asset containing this node
    pub fn asset(&self) -> Option<AssetId> {
        self.asset
    }

    pub(crate) fn set_asset(&mut self, asset: Option<AssetId>) {
        self.asset = asset;
    }

    pub(crate) fn set_subscription(&mut self, subscription: Option<Subscription>) {
        self.subscription = subscription;
    }

    /// Whether the node receives session lifecycle events
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    // Binding

    /// Bind a different logic node.
    ///
    /// Pins are rebuilt for the new node's interface. Returns the released
    /// logic node and the pins that no longer exist.
    pub fn set_logic_node(&mut self, logic: Box<dyn LogicNode>) -> (Box<dyn LogicNode>, Vec<Pin>) {
        let previous = std::mem::replace(&mut self.logic, OwnedLogicNode::new(logic));
        tracing::debug!(
            "Node {:?} rebound from {} to {}",
            self.id,
            previous.get().type_name(),
            self.logic.get().type_name()
        );
        self.reset_ownership();
        let removed = self.reconstruct();
        (previous.into_inner(), removed)
    }

    /// The bound logic node
    pub fn logic_node(&self) -> &dyn LogicNode {
        self.logic.get()
    }

    /// The bound logic node, mutably
    pub fn logic_node_mut(&mut self) -> &mut dyn LogicNode {
        self.logic.get_mut()
    }

    /// Container the logic node is currently parented under
    pub fn logic_outer(&self) -> Outer {
        self.logic.outer()
    }

    /// Make sure the logic node is owned by the containing asset
    pub fn reset_ownership(&mut self) {
        let outer = self.asset.map_or(Outer::Transient, Outer::Asset);
        if self.logic.outer() != outer {
            tracing::debug!("Re-parenting logic node of {:?} to {:?}", self.id, outer);
            self.logic.set_outer(outer);
        }
    }

    /// Call after the containing asset was loaded
    pub fn post_load(&mut self) {
        self.reset_ownership();
    }

    /// Call after the node was duplicated into an asset
    pub fn post_duplicate(&mut self) {
        self.reset_ownership();
    }

    /// Call after the node was pasted into an asset
    pub fn post_paste(&mut self) {
        self.reset_ownership();
    }

    /// Detach the logic node from any asset before it goes to a clipboard
    pub fn prepare_for_copying(&mut self) {
        self.logic.set_outer(Outer::Transient);
    }

    /// Copy with a new identity, no containing asset and no hit state.
    ///
    /// The logic node copy keeps the source's outer until
    /// [`Self::reset_ownership`] runs.
    pub fn duplicate(&self) -> Self {
        let mut inputs = self.inputs.clone();
        let mut outputs = self.outputs.clone();
        inputs.regenerate_ids();
        outputs.regenerate_ids();
        inputs.clear_hits();
        outputs.clear_hits();

        let mut node_breakpoint = self.node_breakpoint;
        node_breakpoint.clear_hit();

        Self {
            id: NodeId::new(),
            logic: self.logic.clone(),
            asset: None,
            inputs,
            outputs,
            node_breakpoint,
            subscription: None,
        }
    }

    /// Short summary of the node's content
    pub fn description(&self) -> String {
        self.logic.get().description()
    }

    /// Information displayed while the node is active
    pub fn status_text(&self) -> String {
        self.logic.get().status_text()
    }

    /// Used for highlighting active nodes
    pub fn activation_state(&self) -> ActivationState {
        self.logic.get().activation_state()
    }

    /// Whether the logic node's content is preloaded
    pub fn is_content_preloaded(&self) -> bool {
        self.logic.get().is_content_preloaded()
    }

    // Pins

    pub(crate) fn side(&self, direction: PinDirection) -> &PinSide {
        match direction {
            PinDirection::Input => &self.inputs,
            PinDirection::Output => &self.outputs,
        }
    }

    fn side_mut(&mut self, direction: PinDirection) -> &mut PinSide {
        match direction {
            PinDirection::Input => &mut self.inputs,
            PinDirection::Output => &mut self.outputs,
        }
    }

    /// Input pins in order
    pub fn input_pins(&self) -> &[Pin] {
        self.inputs.pins()
    }

    /// Output pins in order
    pub fn output_pins(&self) -> &[Pin] {
        self.outputs.pins()
    }

    /// Pin by direction and position
    pub fn pin(&self, direction: PinDirection, index: usize) -> Option<&Pin> {
        self.side(direction).get(index)
    }

    /// Direction and position of a pin
    pub fn find_pin(&self, id: PinId) -> Option<(PinDirection, usize)> {
        [PinDirection::Input, PinDirection::Output]
            .into_iter()
            .find_map(|dir| self.side(dir).index_of(id).map(|index| (dir, index)))
    }

    /// Append a static input pin
    pub fn create_input_pin(&mut self, name: impl Into<String>) -> usize {
        self.inputs.push(Pin::new(name, PinDirection::Input, PinKind::Static))
    }

    /// Append a static output pin
    pub fn create_output_pin(&mut self, name: impl Into<String>) -> usize {
        self.outputs.push(Pin::new(name, PinDirection::Output, PinKind::Static))
    }

    /// Create the logic node's fixed pins and its minimum dynamic pins
    pub fn allocate_default_pins(&mut self) {
        for name in self.logic.get().input_names() {
            self.create_input_pin(name);
        }
        for name in self.logic.get().output_names() {
            self.create_output_pin(name);
        }
        for direction in [PinDirection::Input, PinDirection::Output] {
            let min = self.logic.get().min_dynamic_pins(direction);
            while self.side(direction).dynamic_count() < min {
                self.push_dynamic(direction);
            }
        }
    }

    /// Rebuild static pins from the logic node, keeping dynamic pins on
    /// sides that still accept them and topping up to the minimum.
    ///
    /// Returns the pins that no longer exist.
    pub fn reconstruct(&mut self) -> Vec<Pin> {
        let mut removed = Vec::new();
        for direction in [PinDirection::Input, PinDirection::Output] {
            let logic = self.logic.get();
            let (names, variable) = match direction {
                PinDirection::Input => (logic.input_names(), logic.can_user_add_input()),
                PinDirection::Output => (logic.output_names(), logic.can_user_add_output()),
            };
            let min = logic.min_dynamic_pins(direction);

            let side = self.side_mut(direction);
            removed.extend(side.rebuild_statics(names, direction));
            if !variable {
                removed.extend(side.remove_dynamic());
            }
            while self.side(direction).dynamic_count() < min {
                self.push_dynamic(direction);
            }
        }
        tracing::debug!("Reconstructed node {:?}, {} pins removed", self.id, removed.len());
        removed
    }

    /// Whether authors may add input pins
    pub fn can_add_input(&self) -> bool {
        self.logic.get().can_user_add_input()
    }

    /// Whether authors may add output pins
    pub fn can_add_output(&self) -> bool {
        self.logic.get().can_user_add_output()
    }

    /// Append an author pin to the inputs, if allowed
    pub fn add_user_input(&mut self) -> Option<usize> {
        self.add_user_pin(PinDirection::Input)
    }

    /// Append an author pin to the outputs, if allowed
    pub fn add_user_output(&mut self) -> Option<usize> {
        self.add_user_pin(PinDirection::Output)
    }

    /// Append an author pin on a side, if allowed
    pub fn add_user_pin(&mut self, direction: PinDirection) -> Option<usize> {
        let allowed = match direction {
            PinDirection::Input => self.can_add_input(),
            PinDirection::Output => self.can_add_output(),
        };
        if !allowed {
            return None;
        }
        let index = self.push_dynamic(direction);
        tracing::debug!("Added {:?} pin {} to {:?}", direction, index, self.id);
        Some(index)
    }

    fn push_dynamic(&mut self, direction: PinDirection) -> usize {
        let index = self.side(direction).len();
        let name = self.logic.get().default_pin_name(direction, index);
        self.side_mut(direction)
            .push(Pin::new(name, direction, PinKind::Dynamic))
    }

    /// Whether the author may remove a pin
    pub fn can_user_remove(&self, pin: PinId) -> bool {
        let Some((direction, index)) = self.find_pin(pin) else {
            return false;
        };
        let side = self.side(direction);
        let is_dynamic = side.get(index).is_some_and(Pin::is_dynamic);
        is_dynamic && side.dynamic_count() > self.logic.get().min_dynamic_pins(direction)
    }

    /// Remove an author pin, moving later breakpoints down with their pins
    pub fn remove_user_pin(&mut self, pin: PinId) -> Option<Pin> {
        if !self.can_user_remove(pin) {
            return None;
        }
        let (direction, index) = self.find_pin(pin)?;
        let removed = self.side_mut(direction).remove(index);
        tracing::debug!("Removed {:?} pin {} from {:?}", direction, index, self.id);
        removed
    }

    // Breakpoints

    /// Node-level breakpoint
    pub fn node_breakpoint(&self) -> &BreakpointFlags {
        &self.node_breakpoint
    }

    /// Node-level breakpoint, for add/remove/enable edits
    pub fn node_breakpoint_mut(&mut self) -> &mut BreakpointFlags {
        &mut self.node_breakpoint
    }

    /// Place the node-level breakpoint
    pub fn add_node_breakpoint(&mut self) {
        self.node_breakpoint.add();
    }

    /// Remove the node-level breakpoint
    pub fn remove_node_breakpoint(&mut self) {
        self.node_breakpoint.remove();
    }

    /// Arm or disarm the node-level breakpoint. False if none is placed.
    pub fn toggle_node_breakpoint(&mut self) -> bool {
        if !self.node_breakpoint.can_enable() {
            return false;
        }
        self.node_breakpoint.toggle_enabled();
        true
    }

    /// Breakpoint of a pin, if one was placed
    pub fn pin_breakpoint(&self, direction: PinDirection, index: usize) -> Option<&BreakpointFlags> {
        self.side(direction).breakpoint(index)
    }

    /// Mutable breakpoint of a pin, if one was placed
    pub fn pin_breakpoint_mut(
        &mut self,
        direction: PinDirection,
        index: usize,
    ) -> Option<&mut BreakpointFlags> {
        self.side_mut(direction).breakpoint_mut(index)
    }

    /// Place a breakpoint on a pin. False if the pin does not exist.
    pub fn add_pin_breakpoint(&mut self, direction: PinDirection, index: usize) -> bool {
        self.side_mut(direction).add_breakpoint(index)
    }

    /// Remove the breakpoint of a pin
    pub fn remove_pin_breakpoint(&mut self, direction: PinDirection, index: usize) -> bool {
        self.side_mut(direction).remove_breakpoint(index)
    }

    /// Arm or disarm the breakpoint of a pin
    pub fn toggle_pin_breakpoint(&mut self, direction: PinDirection, index: usize) -> bool {
        match self.pin_breakpoint_mut(direction, index) {
            Some(flags) if flags.can_enable() => {
                flags.toggle_enabled();
                true
            }
            _ => false,
        }
    }

    /// Every pin breakpoint of a side
    pub fn pin_breakpoints(
        &self,
        direction: PinDirection,
    ) -> impl Iterator<Item = (usize, &BreakpointFlags)> {
        self.side(direction).breakpoints()
    }
}
