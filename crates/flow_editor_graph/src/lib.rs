// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor-side flow graph nodes for `OrdoPlay` Editor.
//!
//! This crate provides the editor representation of flow graph nodes:
//! - Binding of each editor node to exactly one executable logic node
//! - Static and author-added input/output pins
//! - Node and pin breakpoints
//! - A bridge pausing interactive debug sessions when breakpoints fire
//!
//! ## Architecture
//!
//! Authoring commands flow from the presentation layer into [`EditorNode`].
//! Pin triggers from a running session flow back through the session bridge
//! into breakpoint state, which the presentation layer polls for highlighting.
//! Session resume and end reach nodes through a [`SessionEventBus`].

pub mod asset;
pub mod breakpoint;
pub mod bridge;
pub mod connection;
pub mod logic;
pub mod node;
pub mod nodes;
pub mod pin;
pub mod session;
pub mod settings;

pub use asset::{AssetId, FlowAsset, GraphError, NodeHandle};
pub use breakpoint::{BreakpointFlags, BreakpointVisual};
pub use connection::{Connection, ConnectionId};
pub use logic::{ActivationState, LogicNode, Outer};
pub use node::{EditorNode, NodeId};
pub use nodes::LogicNodeRegistry;
pub use pin::{Pin, PinDirection, PinId, PinKind};
pub use session::{
    PlaySession, PlayState, SessionController, SessionEvent, SessionEventBus, SessionListener,
};
pub use settings::{DebuggerSettings, SettingsError};
