// SPDX-License-Identifier: MIT OR Apache-2.0
//! Breakpoint flags shared by nodes and pins.
//!
//! A breakpoint is three layered flags rather than an enum so that a
//! declared-but-disabled breakpoint keeps its place while toggled:
//!
//! `hit` implies `enabled`, and `enabled` implies `declared`.

use serde::{Deserialize, Serialize};

/// Breakpoint state of a node or a single pin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StoredBreakpoint")]
pub struct BreakpointFlags {
    /// A breakpoint has been placed by the author
    declared: bool,
    /// The declared breakpoint is armed
    enabled: bool,
    /// Fired during the current session and not yet cleared
    #[serde(skip)]
    hit: bool,
}

/// Persisted form; normalized on load so `enabled` implies `declared`
#[derive(Deserialize)]
struct StoredBreakpoint {
    #[serde(default)]
    declared: bool,
    #[serde(default)]
    enabled: bool,
}

impl From<StoredBreakpoint> for BreakpointFlags {
    fn from(stored: StoredBreakpoint) -> Self {
        Self {
            declared: stored.declared,
            enabled: stored.declared && stored.enabled,
            hit: false,
        }
    }
}

/// How a breakpoint should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointVisual {
    /// No breakpoint placed
    None,
    /// Placed but not armed
    Disabled,
    /// Placed and armed
    Armed,
    /// Armed and fired in the running session
    Hit,
}

impl BreakpointFlags {
    /// Flags with nothing declared
    pub const fn new() -> Self {
        Self {
            declared: false,
            enabled: false,
            hit: false,
        }
    }

    /// Place a breakpoint
    pub fn add(&mut self) {
        self.declared = true;
    }

    /// Remove the breakpoint entirely
    pub fn remove(&mut self) {
        *self = Self::new();
    }

    /// Whether a breakpoint has been placed
    pub fn is_declared(&self) -> bool {
        self.declared
    }

    /// Arm the breakpoint. Ignored unless [`Self::can_enable`] holds.
    pub fn enable(&mut self) {
        if self.can_enable() {
            self.enabled = true;
        }
    }

    /// Only declared breakpoints can be armed
    pub fn can_enable(&self) -> bool {
        self.declared
    }

    /// Disarm the breakpoint. A disarmed breakpoint is never hit.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.hit = false;
    }

    /// Whether the breakpoint is armed
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip between armed and disarmed
    pub fn toggle_enabled(&mut self) {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
    }

    /// Record that the breakpoint fired. Ignored when not armed.
    pub fn mark_hit(&mut self) {
        if self.enabled {
            self.hit = true;
        }
    }

    /// Forget that the breakpoint fired
    pub fn clear_hit(&mut self) {
        self.hit = false;
    }

    /// Whether the breakpoint fired in the current session
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Icon state for the presentation layer
    pub fn visual_state(&self) -> BreakpointVisual {
        match (self.declared, self.enabled, self.hit) {
            (false, _, _) => BreakpointVisual::None,
            (true, false, _) => BreakpointVisual::Disabled,
            (true, true, false) => BreakpointVisual::Armed,
            (true, true, true) => BreakpointVisual::Hit,
        }
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        (!self.hit || self.enabled) && (!self.enabled || self.declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_requires_declaration() {
        let mut flags = BreakpointFlags::new();
        assert!(!flags.can_enable());
        flags.enable();
        assert!(!flags.is_enabled());

        flags.add();
        flags.enable();
        assert!(flags.is_enabled());
        assert_eq!(flags.visual_state(), BreakpointVisual::Armed);
    }

    #[test]
    fn test_remove_then_add_resets() {
        let mut flags = BreakpointFlags::new();
        flags.add();
        flags.enable();
        flags.mark_hit();
        assert!(flags.is_hit());

        flags.remove();
        flags.add();
        assert!(flags.is_declared());
        assert!(!flags.is_enabled());
        assert!(!flags.is_hit());
    }

    #[test]
    fn test_disable_clears_hit_and_is_idempotent() {
        let mut flags = BreakpointFlags::new();
        flags.add();
        flags.enable();
        flags.mark_hit();

        flags.disable();
        let once = flags;
        flags.disable();
        assert_eq!(flags, once);
        assert!(!flags.is_enabled());
        assert!(!flags.is_hit());
        assert!(flags.is_declared());
        assert_eq!(flags.visual_state(), BreakpointVisual::Disabled);
    }

    #[test]
    fn test_mark_hit_ignored_when_disarmed() {
        let mut flags = BreakpointFlags::new();
        flags.mark_hit();
        assert!(!flags.is_hit());

        flags.add();
        flags.mark_hit();
        assert!(!flags.is_hit());
    }

    #[test]
    fn test_toggle_enabled() {
        let mut flags = BreakpointFlags::new();
        flags.toggle_enabled();
        assert!(!flags.is_enabled());

        flags.add();
        flags.toggle_enabled();
        assert!(flags.is_enabled());
        flags.mark_hit();
        flags.toggle_enabled();
        assert!(!flags.is_enabled());
        assert!(!flags.is_hit());
    }

    #[test]
    fn test_invariant_holds_over_all_sequences() {
        type Op = fn(&mut BreakpointFlags);
        let ops: [Op; 7] = [
            BreakpointFlags::add,
            BreakpointFlags::remove,
            BreakpointFlags::enable,
            BreakpointFlags::disable,
            BreakpointFlags::toggle_enabled,
            BreakpointFlags::mark_hit,
            BreakpointFlags::clear_hit,
        ];

        // Every sequence of three operations from the empty state
        for a in ops {
            for b in ops {
                for c in ops {
                    let mut flags = BreakpointFlags::new();
                    for op in [a, b, c] {
                        op(&mut flags);
                        assert!(flags.is_consistent(), "{flags:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_hit_is_not_persisted() {
        let mut flags = BreakpointFlags::new();
        flags.add();
        flags.enable();
        flags.mark_hit();

        let ron_str = ron::to_string(&flags).unwrap();
        let loaded: BreakpointFlags = ron::from_str(&ron_str).unwrap();
        assert!(loaded.is_declared());
        assert!(loaded.is_enabled());
        assert!(!loaded.is_hit());
    }

    #[test]
    fn test_loaded_enabled_requires_declared() {
        let loaded: BreakpointFlags = ron::from_str("(declared: false, enabled: true)").unwrap();
        assert!(!loaded.is_enabled());
        assert!(loaded.is_consistent());
    }
}
