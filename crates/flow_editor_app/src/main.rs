// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` flow debugger - headless breakpoint session driver
//!
//! Builds a small flow asset, places breakpoints on it and replays a
//! session's pin triggers, logging every pause and resume.
//!
//! Usage: `flow_debugger [settings.ron]`

use flow_editor_graph::nodes::flow_control::{Finish, MultiGate, Start, Timer};
use flow_editor_graph::{
    ActivationState, DebuggerSettings, FlowAsset, GraphError, LogicNodeRegistry, NodeId,
    PinDirection, PlaySession, SettingsError,
};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Errors that stop the debugger run
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,flow_editor_graph=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting flow debugger v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(std::env::args().nth(1).map(PathBuf::from)) {
        tracing::error!("Flow debugger failed: {e}");
        std::process::exit(1);
    }
}

fn run(settings_path: Option<PathBuf>) -> Result<(), RunError> {
    let settings = match settings_path {
        Some(path) => DebuggerSettings::load(&path)?,
        None => DebuggerSettings::default(),
    };

    let mut asset = FlowAsset::new("Demo");
    let mut session = PlaySession::with_settings(settings);
    asset.attach_session(session.events());

    let registry = LogicNodeRegistry::with_builtins();
    let start = place(&mut asset, &registry, Start::TYPE)?;
    let gate = place(&mut asset, &registry, MultiGate::TYPE)?;
    let finish = place(&mut asset, &registry, Finish::TYPE)?;

    asset.add_user_pin(gate, PinDirection::Output)?;
    asset.add_user_pin(gate, PinDirection::Output)?;
    link(&mut asset, start, 0, gate, 0)?;
    link(&mut asset, gate, 0, finish, 0)?;
    link(&mut asset, gate, 1, finish, 0)?;

    // Dropping a timer onto the gate's first output splices it in
    let timer = place(&mut asset, &registry, Timer::TYPE)?;
    let gate_out = asset
        .node(gate)
        .and_then(|h| h.lock().output_pins().first().map(|p| p.id))
        .ok_or(GraphError::NodeNotFound(gate))?;
    asset.autowire_new_node(timer, gate, gate_out)?;

    if let Some(handle) = asset.node(gate) {
        let mut node = handle.lock();
        node.add_pin_breakpoint(PinDirection::Output, 1);
        node.toggle_pin_breakpoint(PinDirection::Output, 1);
    }
    if let Some(handle) = asset.node(timer) {
        let mut node = handle.lock();
        node.add_node_breakpoint();
        node.toggle_node_breakpoint();
    }

    session.start();

    // First activation: gate routes to the timer
    asset.trigger(start, PinDirection::Output, 0, &mut session)?;
    asset.trigger(gate, PinDirection::Input, 0, &mut session)?;
    asset.trigger(gate, PinDirection::Output, 0, &mut session)?;
    if let Some(handle) = asset.node(timer) {
        handle.lock().logic_node_mut().set_activation_state(ActivationState::Active);
    }
    asset.trigger(timer, PinDirection::Input, 0, &mut session)?;
    report(&asset, &session, timer);
    session.resume();

    // Second activation: gate routes straight to finish
    asset.trigger(gate, PinDirection::Input, 0, &mut session)?;
    asset.trigger(gate, PinDirection::Output, 1, &mut session)?;
    report(&asset, &session, gate);
    session.resume();

    asset.trigger(finish, PinDirection::Input, 0, &mut session)?;
    session.stop();

    tracing::info!(
        "Session finished after {} pauses, {} connections in {}",
        session.pause_requests(),
        asset.connection_count(),
        asset.name
    );
    Ok(())
}

fn place(
    asset: &mut FlowAsset,
    registry: &LogicNodeRegistry,
    type_id: &str,
) -> Result<NodeId, RunError> {
    let logic = registry
        .create(type_id)
        .ok_or_else(|| RunError::UnknownNodeType(type_id.to_string()))?;
    Ok(asset.place_node(logic))
}

fn link(
    asset: &mut FlowAsset,
    from: NodeId,
    output: usize,
    to: NodeId,
    input: usize,
) -> Result<(), GraphError> {
    let from_pin = asset
        .node(from)
        .and_then(|h| h.lock().output_pins().get(output).map(|p| p.id))
        .ok_or(GraphError::NodeNotFound(from))?;
    let to_pin = asset
        .node(to)
        .and_then(|h| h.lock().input_pins().get(input).map(|p| p.id))
        .ok_or(GraphError::NodeNotFound(to))?;
    asset.connect(from, from_pin, to, to_pin)?;
    Ok(())
}

fn report(asset: &FlowAsset, session: &PlaySession, node_id: NodeId) {
    let Some(handle) = asset.node(node_id) else {
        return;
    };
    let node = handle.lock();
    tracing::info!(
        "{:?}: {} [{}] node breakpoint {:?}, status '{}'",
        session.state(),
        node.logic_node().type_name(),
        node.description(),
        node.node_breakpoint().visual_state(),
        node.status_text()
    );
    for direction in [PinDirection::Input, PinDirection::Output] {
        for (index, flags) in node.pin_breakpoints(direction) {
            tracing::info!("  {:?} pin {} breakpoint {:?}", direction, index, flags.visual_state());
        }
    }
}
