// SPDX-License-Identifier: MIT OR Apache-2.0
//! The executable logic node an editor node is bound to.
//!
//! Editor nodes only see logic nodes through the [`LogicNode`] trait. Concrete
//! behaviors live in [`crate::nodes`].

use crate::asset::AssetId;
use crate::pin::PinDirection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime activation of a logic node, used for highlighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationState {
    /// Not activated in the current session
    #[default]
    NeverActivated,
    /// Currently running
    Active,
    /// Ran earlier in the current session
    WasActive,
}

/// Capability interface of an executable flow node
pub trait LogicNode: fmt::Debug + Send {
    /// Type identifier, matching the registry key
    fn type_name(&self) -> &str;

    /// Names of the fixed input pins
    fn input_names(&self) -> Vec<String>;

    /// Names of the fixed output pins
    fn output_names(&self) -> Vec<String>;

    /// Whether authors may append input pins
    fn can_user_add_input(&self) -> bool {
        false
    }

    /// Whether authors may append output pins
    fn can_user_add_output(&self) -> bool {
        false
    }

    /// Minimum number of author-added pins on a side
    fn min_dynamic_pins(&self, _direction: PinDirection) -> usize {
        0
    }

    /// Default name for a pin appended at `index` on a side
    fn default_pin_name(&self, _direction: PinDirection, index: usize) -> String {
        index.to_string()
    }

    /// Short summary of the node's content
    fn description(&self) -> String {
        String::new()
    }

    /// Information shown while the node is active
    fn status_text(&self) -> String {
        String::new()
    }

    /// Current activation state
    fn activation_state(&self) -> ActivationState;

    /// Update the activation state reported by the running session
    fn set_activation_state(&mut self, state: ActivationState);

    /// Whether the node's content is preloaded
    fn is_content_preloaded(&self) -> bool {
        false
    }

    /// Deep copy used by duplication and paste
    fn clone_box(&self) -> Box<dyn LogicNode>;
}

impl Clone for Box<dyn LogicNode> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Container a logic node is parented under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outer {
    /// Owned by a flow asset
    Asset(AssetId),
    /// Not owned by any asset yet, or left over from a clipboard or duplicate
    #[default]
    Transient,
}

/// A logic node together with its outer
#[derive(Debug, Clone)]
pub struct OwnedLogicNode {
    instance: Box<dyn LogicNode>,
    outer: Outer,
}

impl OwnedLogicNode {
    /// Wrap a fresh, unparented instance
    pub fn new(instance: Box<dyn LogicNode>) -> Self {
        Self {
            instance,
            outer: Outer::Transient,
        }
    }

    /// The instance
    pub fn get(&self) -> &dyn LogicNode {
        self.instance.as_ref()
    }

    /// The instance, mutably
    pub fn get_mut(&mut self) -> &mut dyn LogicNode {
        self.instance.as_mut()
    }

    /// Current outer
    pub fn outer(&self) -> Outer {
        self.outer
    }

    /// Re-parent the instance
    pub fn set_outer(&mut self, outer: Outer) {
        self.outer = outer;
    }

    /// Give the instance back
    pub fn into_inner(self) -> Box<dyn LogicNode> {
        self.instance
    }
}
