// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connects pin triggers of a running session to editor node breakpoints.

use crate::node::EditorNode;
use crate::pin::{PinDirection, PinSide};
use crate::session::{SessionController, SessionListener};

impl EditorNode {
    /// An input pin of the logic node fired
    pub fn on_input_triggered(&mut self, index: usize, session: &mut dyn SessionController) {
        self.on_pin_triggered(PinDirection::Input, index, session);
    }

    /// An output pin of the logic node fired
    pub fn on_output_triggered(&mut self, index: usize, session: &mut dyn SessionController) {
        self.on_pin_triggered(PinDirection::Output, index, session);
    }

    /// A pin of the logic node fired.
    ///
    /// Any input trigger also checks the node-level breakpoint, once per
    /// activation until the session resumes.
    pub fn on_pin_triggered(
        &mut self,
        direction: PinDirection,
        index: usize,
        session: &mut dyn SessionController,
    ) {
        if !session.is_live() {
            return;
        }
        if index >= self.side(direction).len() {
            // Happens while a node is being reconstructed
            tracing::debug!("Ignoring {:?} trigger {} on {:?}", direction, index, self.id());
            return;
        }
        if session.logs_triggers() {
            tracing::debug!("{:?} pin {} triggered on {:?}", direction, index, self.id());
        }
        if !session.breakpoints_enabled() {
            return;
        }

        let side = match direction {
            PinDirection::Input => &mut self.inputs,
            PinDirection::Output => &mut self.outputs,
        };
        let mut pause = mark_pin_hit(side, index);

        if direction == PinDirection::Input
            && session.pauses_on_node_breakpoints()
            && self.node_breakpoint.is_enabled()
            && !self.node_breakpoint.is_hit()
        {
            self.node_breakpoint.mark_hit();
            pause = true;
        }

        // Hits are recorded before pausing so a paused session sees them
        if pause && !session.is_paused() {
            tracing::info!("Breakpoint hit on {:?}, pausing session", self.id());
            session.request_pause();
        }
    }

    /// A paused session continued
    pub fn on_session_resumed(&mut self) {
        self.reset_breakpoint_hits();
    }

    /// The session ended or was aborted
    pub fn on_session_ended(&mut self) {
        self.reset_breakpoint_hits();
    }

    fn reset_breakpoint_hits(&mut self) {
        self.node_breakpoint.clear_hit();
        self.inputs.clear_hits();
        self.outputs.clear_hits();
    }
}

fn mark_pin_hit(side: &mut PinSide, index: usize) -> bool {
    match side.breakpoint_mut(index) {
        Some(flags) if flags.is_enabled() => {
            flags.mark_hit();
            true
        }
        _ => false,
    }
}

impl SessionListener for EditorNode {
    fn on_session_resumed(&mut self) {
        EditorNode::on_session_resumed(self);
    }

    fn on_session_ended(&mut self) {
        EditorNode::on_session_ended(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::flow_control::{MultiGate, Timer};
    use crate::session::PlaySession;
    use crate::settings::DebuggerSettings;

    /// Controller recording pause requests
    #[derive(Default)]
    struct MockSession {
        live: bool,
        paused: bool,
        requests: u32,
        skip_node_breakpoints: bool,
    }

    impl MockSession {
        fn live() -> Self {
            Self {
                live: true,
                ..Self::default()
            }
        }
    }

    impl SessionController for MockSession {
        fn is_live(&self) -> bool {
            self.live
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn request_pause(&mut self) {
            self.requests += 1;
            self.paused = true;
        }

        fn pauses_on_node_breakpoints(&self) -> bool {
            !self.skip_node_breakpoints
        }
    }

    fn armed_timer() -> EditorNode {
        let mut node = EditorNode::new(Box::new(Timer::new(1.0)));
        node.add_pin_breakpoint(PinDirection::Input, 0);
        node.toggle_pin_breakpoint(PinDirection::Input, 0);
        node
    }

    #[test]
    fn test_enabled_pin_breakpoint_pauses_once() {
        let mut node = armed_timer();
        let mut session = MockSession::live();

        node.on_input_triggered(0, &mut session);
        assert!(node.pin_breakpoint(PinDirection::Input, 0).unwrap().is_hit());
        assert_eq!(session.requests, 1);

        node.on_input_triggered(0, &mut session);
        assert_eq!(session.requests, 1);
    }

    #[test]
    fn test_disabled_pin_breakpoint_is_ignored() {
        let mut node = EditorNode::new(Box::new(Timer::new(1.0)));
        node.add_pin_breakpoint(PinDirection::Input, 0);
        let mut session = MockSession::live();

        node.on_input_triggered(0, &mut session);
        node.on_input_triggered(1, &mut session);
        assert!(!node.pin_breakpoint(PinDirection::Input, 0).unwrap().is_hit());
        assert_eq!(session.requests, 0);
    }

    #[test]
    fn test_out_of_range_trigger_is_ignored() {
        let mut node = armed_timer();
        let mut session = MockSession::live();
        node.on_input_triggered(7, &mut session);
        node.on_output_triggered(7, &mut session);
        assert_eq!(session.requests, 0);
    }

    #[test]
    fn test_trigger_without_live_session_is_ignored() {
        let mut node = armed_timer();
        let mut session = MockSession::default();
        node.on_input_triggered(0, &mut session);
        assert!(!node.pin_breakpoint(PinDirection::Input, 0).unwrap().is_hit());
        assert_eq!(session.requests, 0);
    }

    #[test]
    fn test_output_breakpoint() {
        let mut node = EditorNode::new(Box::new(MultiGate::default()));
        node.add_user_output();
        node.add_pin_breakpoint(PinDirection::Output, 0);
        node.toggle_pin_breakpoint(PinDirection::Output, 0);
        node.add_node_breakpoint();
        node.toggle_node_breakpoint();
        let mut session = MockSession::live();

        node.on_output_triggered(0, &mut session);
        assert!(node.pin_breakpoint(PinDirection::Output, 0).unwrap().is_hit());
        // Outputs never fire the node breakpoint
        assert!(!node.node_breakpoint().is_hit());
        assert_eq!(session.requests, 1);
    }

    #[test]
    fn test_node_breakpoint_fires_once_per_activation() {
        let mut node = EditorNode::new(Box::new(Timer::new(1.0)));
        node.add_node_breakpoint();
        node.toggle_node_breakpoint();
        let mut session = MockSession::live();

        node.on_input_triggered(1, &mut session);
        assert!(node.node_breakpoint().is_hit());
        assert_eq!(session.requests, 1);

        session.paused = false;
        node.on_input_triggered(2, &mut session);
        assert_eq!(session.requests, 1);

        node.on_session_resumed();
        node.on_input_triggered(0, &mut session);
        assert_eq!(session.requests, 2);
    }

    #[test]
    fn test_node_breakpoint_respects_controller() {
        let mut node = EditorNode::new(Box::new(Timer::new(1.0)));
        node.add_node_breakpoint();
        node.toggle_node_breakpoint();
        let mut session = MockSession {
            skip_node_breakpoints: true,
            ..MockSession::live()
        };

        node.on_input_triggered(0, &mut session);
        assert!(!node.node_breakpoint().is_hit());
        assert_eq!(session.requests, 0);
    }

    #[test]
    fn test_session_end_clears_hits_only() {
        let mut node = armed_timer();
        node.add_pin_breakpoint(PinDirection::Output, 2);
        node.toggle_pin_breakpoint(PinDirection::Output, 2);
        node.add_node_breakpoint();
        node.toggle_node_breakpoint();
        let mut session = MockSession::live();

        node.on_input_triggered(0, &mut session);
        node.on_output_triggered(2, &mut session);
        assert!(node.pin_breakpoint(PinDirection::Output, 2).unwrap().is_hit());

        SessionListener::on_session_ended(&mut node);

        assert!(!node.node_breakpoint().is_hit());
        assert!(node.node_breakpoint().is_enabled());
        for direction in [PinDirection::Input, PinDirection::Output] {
            for (_, flags) in node.pin_breakpoints(direction) {
                assert!(!flags.is_hit());
                assert!(flags.is_declared() && flags.is_enabled());
            }
        }
    }

    #[test]
    fn test_master_switch_leaves_breakpoints_untouched() {
        let mut node = armed_timer();
        node.add_node_breakpoint();
        node.toggle_node_breakpoint();
        let settings = DebuggerSettings {
            breakpoints_enabled: false,
            ..DebuggerSettings::default()
        };
        let mut session = PlaySession::with_settings(settings);
        session.start();

        node.on_input_triggered(0, &mut session);

        assert!(!session.is_paused());
        assert!(!node.pin_breakpoint(PinDirection::Input, 0).unwrap().is_hit());
        assert!(!node.node_breakpoint().is_hit());
        assert_eq!(session.pause_requests(), 0);
    }
}
