// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin definitions and the per-side pin list of an editor node.

use crate::breakpoint::BreakpointFlags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId(pub Uuid);

impl PinId {
    /// Create a new random pin ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    /// Input pin
    Input,
    /// Output pin
    Output,
}

/// Where a pin came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinKind {
    /// Declared by the logic node's fixed interface
    Static,
    /// Added by the author
    Dynamic,
}

/// A named connection point on a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// Stable pin ID, used by connections
    pub id: PinId,
    /// Display name. Not required to be unique.
    pub name: String,
    /// Pin direction
    pub direction: PinDirection,
    /// Static or author-added
    pub kind: PinKind,
}

impl Pin {
    /// Create a new pin
    pub fn new(name: impl Into<String>, direction: PinDirection, kind: PinKind) -> Self {
        Self {
            id: PinId::new(),
            name: name.into(),
            direction,
            kind,
        }
    }

    /// Whether the author added this pin
    pub fn is_dynamic(&self) -> bool {
        self.kind == PinKind::Dynamic
    }
}

/// Ordered pins of one side of a node together with their breakpoints.
///
/// Breakpoints are keyed by pin position. Every structural edit goes
/// through this type so the keys always follow their pins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "StoredPinSide")]
pub struct PinSide {
    pins: Vec<Pin>,
    breakpoints: BTreeMap<usize, BreakpointFlags>,
}

#[derive(Deserialize)]
struct StoredPinSide {
    #[serde(default)]
    pins: Vec<Pin>,
    #[serde(default)]
    breakpoints: BTreeMap<usize, BreakpointFlags>,
}

impl From<StoredPinSide> for PinSide {
    fn from(stored: StoredPinSide) -> Self {
        let count = stored.pins.len();
        let mut breakpoints = stored.breakpoints;
        breakpoints.retain(|i, _| *i < count);
        Self {
            pins: stored.pins,
            breakpoints,
        }
    }
}

impl PinSide {
    /// Create an empty side
    pub fn new() -> Self {
        Self::default()
    }

    /// All pins in order
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Pin at a position
    pub fn get(&self, index: usize) -> Option<&Pin> {
        self.pins.get(index)
    }

    /// Position of a pin
    pub fn index_of(&self, id: PinId) -> Option<usize> {
        self.pins.iter().position(|p| p.id == id)
    }

    /// Number of pins
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Whether there are no pins
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Number of author-added pins
    pub fn dynamic_count(&self) -> usize {
        self.pins.iter().filter(|p| p.is_dynamic()).count()
    }

    /// Append a pin, returning its position
    pub fn push(&mut self, pin: Pin) -> usize {
        self.pins.push(pin);
        self.pins.len() - 1
    }

    /// Remove the pin at `index`, dropping its breakpoint and shifting
    /// every later breakpoint down by one.
    pub fn remove(&mut self, index: usize) -> Option<Pin> {
        if index >= self.pins.len() {
            return None;
        }
        let pin = self.pins.remove(index);
        self.breakpoints = std::mem::take(&mut self.breakpoints)
            .into_iter()
            .filter(|(i, _)| *i != index)
            .map(|(i, flags)| if i > index { (i - 1, flags) } else { (i, flags) })
            .collect();
        Some(pin)
    }

    /// Replace the static pins with `names`, keeping dynamic pins after them.
    ///
    /// A static pin whose name survives keeps its ID and breakpoint. Returns
    /// the pins that no longer exist.
    pub fn rebuild_statics(&mut self, names: Vec<String>, direction: PinDirection) -> Vec<Pin> {
        let saved = self.breakpoints_by_pin();
        let (dynamic, mut leftovers): (Vec<Pin>, Vec<Pin>) =
            std::mem::take(&mut self.pins).into_iter().partition(Pin::is_dynamic);

        for name in names {
            match leftovers.iter().position(|p| p.name == name) {
                Some(pos) => self.pins.push(leftovers.remove(pos)),
                None => self.pins.push(Pin::new(name, direction, PinKind::Static)),
            }
        }
        self.pins.extend(dynamic);
        self.restore_breakpoints(saved);
        leftovers
    }

    /// Remove every author-added pin, returning them
    pub fn remove_dynamic(&mut self) -> Vec<Pin> {
        let saved = self.breakpoints_by_pin();
        let (removed, kept): (Vec<Pin>, Vec<Pin>) =
            std::mem::take(&mut self.pins).into_iter().partition(Pin::is_dynamic);
        self.pins = kept;
        self.restore_breakpoints(saved);
        removed
    }

    fn breakpoints_by_pin(&self) -> Vec<(PinId, BreakpointFlags)> {
        self.breakpoints
            .iter()
            .filter_map(|(i, flags)| self.pins.get(*i).map(|pin| (pin.id, *flags)))
            .collect()
    }

    fn restore_breakpoints(&mut self, saved: Vec<(PinId, BreakpointFlags)>) {
        self.breakpoints = saved
            .into_iter()
            .filter_map(|(id, flags)| self.index_of(id).map(|i| (i, flags)))
            .collect();
    }

    /// Breakpoint entry for a position
    pub fn breakpoint(&self, index: usize) -> Option<&BreakpointFlags> {
        self.breakpoints.get(&index)
    }

    /// Mutable breakpoint entry for a position
    pub fn breakpoint_mut(&mut self, index: usize) -> Option<&mut BreakpointFlags> {
        self.breakpoints.get_mut(&index)
    }

    /// Declare a breakpoint on an existing pin
    pub fn add_breakpoint(&mut self, index: usize) -> bool {
        if index >= self.pins.len() {
            return false;
        }
        self.breakpoints.entry(index).or_default().add();
        true
    }

    /// Drop the breakpoint entry of a pin
    pub fn remove_breakpoint(&mut self, index: usize) -> bool {
        self.breakpoints.remove(&index).is_some()
    }

    /// All breakpoint entries in position order
    pub fn breakpoints(&self) -> impl Iterator<Item = (usize, &BreakpointFlags)> {
        self.breakpoints.iter().map(|(i, flags)| (*i, flags))
    }

    /// Give every pin a fresh ID, keeping names and breakpoints
    pub(crate) fn regenerate_ids(&mut self) {
        for pin in &mut self.pins {
            pin.id = PinId::new();
        }
    }

    /// Clear the hit flag of every entry
    pub fn clear_hits(&mut self) {
        for flags in self.breakpoints.values_mut() {
            flags.clear_hit();
        }
    }
}
