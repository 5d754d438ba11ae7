// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in flow control nodes.

use super::{LogicNodeRegistry, NodeCategory, NodeTypeInfo};
use crate::logic::{ActivationState, LogicNode};
use crate::pin::PinDirection;

/// Register every node in this module
pub fn register(registry: &mut LogicNodeRegistry) {
    registry.register(NodeTypeInfo {
        id: Start::TYPE,
        name: "Start",
        category: NodeCategory::Route,
        factory: || Box::new(Start::default()),
    });
    registry.register(NodeTypeInfo {
        id: Finish::TYPE,
        name: "Finish",
        category: NodeCategory::Route,
        factory: || Box::new(Finish::default()),
    });
    registry.register(NodeTypeInfo {
        id: Sequence::TYPE,
        name: "Sequence",
        category: NodeCategory::Flow,
        factory: || Box::new(Sequence::default()),
    });
    registry.register(NodeTypeInfo {
        id: MultiGate::TYPE,
        name: "Multi Gate",
        category: NodeCategory::Flow,
        factory: || Box::new(MultiGate::default()),
    });
    registry.register(NodeTypeInfo {
        id: LogicalAnd::TYPE,
        name: "AND",
        category: NodeCategory::Logic,
        factory: || Box::new(LogicalAnd::default()),
    });
    registry.register(NodeTypeInfo {
        id: Timer::TYPE,
        name: "Timer",
        category: NodeCategory::Time,
        factory: || Box::new(Timer::new(1.0)),
    });
    registry.register(NodeTypeInfo {
        id: SubGraph::TYPE,
        name: "Sub Graph",
        category: NodeCategory::Graph,
        factory: || Box::new(SubGraph::default()),
    });
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

/// Entry point of a flow
#[derive(Debug, Clone, Default)]
pub struct Start {
    activation: ActivationState,
}

impl Start {
    /// Registry key
    pub const TYPE: &'static str = "start";
}

impl LogicNode for Start {
    fn type_name(&self) -> &str {
        Self::TYPE
    }

    fn input_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn output_names(&self) -> Vec<String> {
        names(&["Out"])
    }

    fn activation_state(&self) -> ActivationState {
        self.activation
    }

    fn set_activation_state(&mut self, state: ActivationState) {
        self.activation = state;
    }

    fn clone_box(&self) -> Box<dyn LogicNode> {
        Box::new(self.clone())
    }
}

/// Exit point of a flow
#[derive(Debug, Clone, Default)]
pub struct Finish {
    activation: ActivationState,
}

impl Finish {
    /// Registry key
    pub const TYPE: &'static str = "finish";
}

impl LogicNode for Finish {
    fn type_name(&self) -> &str {
        Self::TYPE
    }

    fn input_names(&self) -> Vec<String> {
        names(&["In"])
    }

    fn output_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn activation_state(&self) -> ActivationState {
        self.activation
    }

    fn set_activation_state(&mut self, state: ActivationState) {
        self.activation = state;
    }

    fn clone_box(&self) -> Box<dyn LogicNode> {
        Box::new(self.clone())
    }
}

/// Fires every output in order
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    activation: ActivationState,
}

impl Sequence {
    /// Registry key
    pub const TYPE: &'static str = "sequence";
}

impl LogicNode for Sequence {
    fn type_name(&self) -> &str {
        Self::TYPE
    }

    fn input_names(&self) -> Vec<String> {
        names(&["In"])
    }

    fn output_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn can_user_add_output(&self) -> bool {
        true
    }

    fn min_dynamic_pins(&self, direction: PinDirection) -> usize {
        match direction {
            PinDirection::Input => 0,
            PinDirection::Output => 2,
        }
    }

    fn activation_state(&self) -> ActivationState {
        self.activation
    }

    fn set_activation_state(&mut self, state: ActivationState) {
        self.activation = state;
    }

    fn clone_box(&self) -> Box<dyn LogicNode> {
        Box::new(self.clone())
    }
}

/// Fires one output per activation, in order or at random
#[derive(Debug, Clone, Default)]
pub struct MultiGate {
    /// Pick outputs at random instead of in order
    pub random: bool,
    /// Start over after the last output
    pub looping: bool,
    activation: ActivationState,
}

impl MultiGate {
    /// Registry key
    pub const TYPE: &'static str = "multi_gate";
}

impl LogicNode for MultiGate {
    fn type_name(&self) -> &str {
        Self::TYPE
    }

    fn input_names(&self) -> Vec<String> {
        names(&["In", "Reset"])
    }

    fn output_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn can_user_add_output(&self) -> bool {
        true
    }

    fn description(&self) -> String {
        match (self.random, self.looping) {
            (true, true) => "Random, loop".to_string(),
            (true, false) => "Random".to_string(),
            (false, true) => "Loop".to_string(),
            (false, false) => String::new(),
        }
    }

    fn activation_state(&self) -> ActivationState {
        self.activation
    }

    fn set_activation_state(&mut self, state: ActivationState) {
        self.activation = state;
    }

    fn clone_box(&self) -> Box<dyn LogicNode> {
        Box::new(self.clone())
    }
}

/// Fires once every input has been triggered
#[derive(Debug, Clone, Default)]
pub struct LogicalAnd {
    activation: ActivationState,
}

impl LogicalAnd {
    /// Registry key
    pub const TYPE: &'static str = "logical_and";
}

impl LogicNode for LogicalAnd {
    fn type_name(&self) -> &str {
        Self::TYPE
    }

    fn input_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn output_names(&self) -> Vec<String> {
        names(&["Out"])
    }

    fn can_user_add_input(&self) -> bool {
        true
    }

    fn min_dynamic_pins(&self, direction: PinDirection) -> usize {
        match direction {
            PinDirection::Input => 2,
            PinDirection::Output => 0,
        }
    }

    fn activation_state(&self) -> ActivationState {
        self.activation
    }

    fn set_activation_state(&mut self, state: ActivationState) {
        self.activation = state;
    }

    fn clone_box(&self) -> Box<dyn LogicNode> {
        Box::new(self.clone())
    }
}

/// Waits for a duration, optionally firing a step output
#[derive(Debug, Clone)]
pub struct Timer {
    /// Seconds until completion
    pub duration: f32,
    /// Seconds between step outputs, zero to disable
    pub step: f32,
    remaining: f32,
    activation: ActivationState,
}

impl Timer {
    /// Registry key
    pub const TYPE: &'static str = "timer";

    /// Timer completing after `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            step: 0.0,
            remaining: duration,
            activation: ActivationState::NeverActivated,
        }
    }

    /// Report how much time is left
    pub fn set_remaining(&mut self, seconds: f32) {
        self.remaining = seconds.clamp(0.0, self.duration);
    }
}

impl LogicNode for Timer {
    fn type_name(&self) -> &str {
        Self::TYPE
    }

    fn input_names(&self) -> Vec<String> {
        names(&["In", "Skip", "Restart"])
    }

    fn output_names(&self) -> Vec<String> {
        names(&["Completed", "Step", "Skipped"])
    }

    fn description(&self) -> String {
        if self.step > 0.0 {
            format!("{:.2} sec, step by {:.2}", self.duration, self.step)
        } else {
            format!("{:.2} sec", self.duration)
        }
    }

    fn status_text(&self) -> String {
        if self.activation == ActivationState::Active {
            format!("{:.2} sec left", self.remaining)
        } else {
            String::new()
        }
    }

    fn activation_state(&self) -> ActivationState {
        self.activation
    }

    fn set_activation_state(&mut self, state: ActivationState) {
        if state == ActivationState::Active && self.activation != ActivationState::Active {
            self.remaining = self.duration;
        }
        self.activation = state;
    }

    fn clone_box(&self) -> Box<dyn LogicNode> {
        Box::new(self.clone())
    }
}

/// Runs another flow asset
#[derive(Debug, Clone, Default)]
pub struct SubGraph {
    /// Path of the flow asset to run
    pub asset_path: String,
    /// Whether the asset was loaded ahead of activation
    pub preloaded: bool,
    activation: ActivationState,
}

impl SubGraph {
    /// Registry key
    pub const TYPE: &'static str = "sub_graph";
}

impl LogicNode for SubGraph {
    fn type_name(&self) -> &str {
        Self::TYPE
    }

    fn input_names(&self) -> Vec<String> {
        names(&["Start"])
    }

    fn output_names(&self) -> Vec<String> {
        names(&["Finish"])
    }

    fn description(&self) -> String {
        self.asset_path.clone()
    }

    fn activation_state(&self) -> ActivationState {
        self.activation
    }

    fn set_activation_state(&mut self, state: ActivationState) {
        self.activation = state;
    }

    fn is_content_preloaded(&self) -> bool {
        self.preloaded
    }

    fn clone_box(&self) -> Box<dyn LogicNode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_status_only_while_active() {
        let mut timer = Timer::new(2.0);
        assert_eq!(timer.description(), "2.00 sec");
        assert!(timer.status_text().is_empty());

        timer.set_activation_state(ActivationState::Active);
        timer.set_remaining(0.5);
        assert_eq!(timer.status_text(), "0.50 sec left");

        timer.set_activation_state(ActivationState::WasActive);
        assert!(timer.status_text().is_empty());
    }

    #[test]
    fn test_capabilities() {
        let gate = MultiGate::default();
        assert!(gate.can_user_add_output());
        assert!(!gate.can_user_add_input());
        assert_eq!(gate.input_names(), ["In", "Reset"]);

        let and = LogicalAnd::default();
        assert_eq!(and.min_dynamic_pins(PinDirection::Input), 2);
        assert_eq!(and.default_pin_name(PinDirection::Input, 3), "3");
    }
}
