// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interactive debugging sessions.
//!
//! This module handles:
//! - The controller interface editor nodes use to pause a running session
//! - Session lifecycle broadcasts (resume, end) to subscribed nodes
//! - A play session implementing both

use crate::settings::DebuggerSettings;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Play state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// No session running
    #[default]
    Stopped,
    /// Session is running
    Playing,
    /// Session is paused
    Paused,
}

impl PlayState {
    /// Check if a session is live (playing or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, PlayState::Playing | PlayState::Paused)
    }

    /// Check if currently paused
    pub fn is_paused(&self) -> bool {
        matches!(self, PlayState::Paused)
    }
}

/// What editor nodes may ask of the running session
pub trait SessionController {
    /// Whether a session is currently live
    fn is_live(&self) -> bool;

    /// Whether the session is paused
    fn is_paused(&self) -> bool;

    /// Ask the session to pause. Returns immediately.
    fn request_pause(&mut self);

    /// Whether breakpoints may fire at all
    fn breakpoints_enabled(&self) -> bool {
        true
    }

    /// Whether node-level breakpoints should pause the session
    fn pauses_on_node_breakpoints(&self) -> bool {
        true
    }

    /// Whether editor nodes should log every trigger they receive
    fn logs_triggers(&self) -> bool {
        false
    }
}

/// Session lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A paused session continued
    Resumed,
    /// The session ended or was aborted
    Ended,
}

/// Receiver of session lifecycle transitions
pub trait SessionListener {
    /// A paused session continued
    fn on_session_resumed(&mut self);

    /// The session ended
    fn on_session_ended(&mut self);
}

/// Shared handle to a listener
pub type ListenerHandle = Arc<Mutex<dyn SessionListener + Send>>;

/// Subscription registry for session lifecycle transitions.
///
/// Holds listeners weakly. Dropping the [`Subscription`] returned by
/// [`SessionEventBus::subscribe`] removes the listener.
#[derive(Default)]
pub struct SessionEventBus {
    listeners: Mutex<Vec<(u64, Weak<Mutex<dyn SessionListener + Send>>)>>,
    next_id: AtomicU64,
}

impl SessionEventBus {
    /// Create a new bus
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a listener
    pub fn subscribe(self: &Arc<Self>, listener: &ListenerHandle) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::downgrade(listener)));
        Subscription {
            id,
            bus: Arc::downgrade(self),
        }
    }

    fn unsubscribe(&self, id: u64) {
        self.listeners.lock().retain(|(sub, _)| *sub != id);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver an event to every live listener
    pub fn broadcast(&self, event: SessionEvent) {
        // Collect first so no listener runs while the registry is locked
        let live: Vec<ListenerHandle> = {
            let mut listeners = self.listeners.lock();
            listeners.retain(|(_, weak)| weak.strong_count() > 0);
            listeners.iter().filter_map(|(_, weak)| weak.upgrade()).collect()
        };

        for listener in &live {
            let mut listener = listener.lock();
            match event {
                SessionEvent::Resumed => listener.on_session_resumed(),
                SessionEvent::Ended => listener.on_session_ended(),
            }
        }
        tracing::debug!("Delivered {:?} to {} listeners", event, live.len());
    }
}

impl fmt::Debug for SessionEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Registration on a [`SessionEventBus`], removed on drop
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    bus: Weak<SessionEventBus>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

/// Interactive play session driving breakpoints
pub struct PlaySession {
    state: PlayState,
    settings: DebuggerSettings,
    events: Arc<SessionEventBus>,
    pause_requests: u32,
}

impl PlaySession {
    /// Create a stopped session with default settings
    pub fn new() -> Self {
        Self::with_settings(DebuggerSettings::default())
    }

    /// Create a stopped session
    pub fn with_settings(settings: DebuggerSettings) -> Self {
        Self {
            state: PlayState::Stopped,
            settings,
            events: SessionEventBus::new(),
            pause_requests: 0,
        }
    }

    /// Lifecycle bus nodes subscribe to
    pub fn events(&self) -> &Arc<SessionEventBus> {
        &self.events
    }

    /// Active settings
    pub fn settings(&self) -> &DebuggerSettings {
        &self.settings
    }

    /// Current play state
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Number of pause requests honored since the session started
    pub fn pause_requests(&self) -> u32 {
        self.pause_requests
    }

    /// Begin a session. Returns false if one is already live.
    pub fn start(&mut self) -> bool {
        if self.state.is_active() {
            return false;
        }
        self.state = PlayState::Playing;
        self.pause_requests = 0;
        tracing::info!("Started debug session");
        true
    }

    /// Continue a paused session and notify listeners
    pub fn resume(&mut self) -> bool {
        if self.state != PlayState::Paused {
            return false;
        }
        self.state = PlayState::Playing;
        tracing::info!("Resumed debug session");
        self.events.broadcast(SessionEvent::Resumed);
        true
    }

    /// End the session and notify listeners
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.state = PlayState::Stopped;
        tracing::info!("Stopped debug session");
        self.events.broadcast(SessionEvent::Ended);
        true
    }
}

impl Drop for PlaySession {
    fn drop(&mut self) {
        // An aborted session still ends for its listeners
        if self.state.is_active() {
            tracing::warn!("Debug session dropped while live");
            self.stop();
        }
    }
}

impl Default for PlaySession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController for PlaySession {
    fn is_live(&self) -> bool {
        self.state.is_active()
    }

    fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    fn request_pause(&mut self) {
        if !self.settings.breakpoints_enabled || self.state != PlayState::Playing {
            return;
        }
        self.state = PlayState::Paused;
        self.pause_requests += 1;
        tracing::info!("Paused debug session on breakpoint");
    }

    fn breakpoints_enabled(&self) -> bool {
        self.settings.breakpoints_enabled
    }

    fn pauses_on_node_breakpoints(&self) -> bool {
        self.settings.pause_on_node_breakpoints
    }

    fn logs_triggers(&self) -> bool {
        self.settings.log_triggers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        resumed: u32,
        ended: u32,
    }

    impl SessionListener for Counter {
        fn on_session_resumed(&mut self) {
            self.resumed += 1;
        }

        fn on_session_ended(&mut self) {
            self.ended += 1;
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = PlaySession::new();
        assert!(!session.is_live());
        assert!(!session.resume());

        assert!(session.start());
        assert!(!session.start());
        session.request_pause();
        session.request_pause();
        assert!(session.is_paused());
        assert_eq!(session.pause_requests(), 1);

        assert!(session.resume());
        assert_eq!(session.state(), PlayState::Playing);
        assert!(session.stop());
        assert!(!session.is_live());
    }

    #[test]
    fn test_pause_ignored_when_breakpoints_disabled() {
        let settings = DebuggerSettings {
            breakpoints_enabled: false,
            ..DebuggerSettings::default()
        };
        let mut session = PlaySession::with_settings(settings);
        session.start();
        session.request_pause();
        assert!(!session.is_paused());
    }

    #[test]
    fn test_bus_delivers_and_unsubscribes() {
        let mut session = PlaySession::new();
        let counter = Arc::new(Mutex::new(Counter::default()));
        let handle: ListenerHandle = counter.clone();
        let subscription = session.events().subscribe(&handle);

        session.start();
        session.request_pause();
        session.resume();
        session.stop();
        assert_eq!(counter.lock().resumed, 1);
        assert_eq!(counter.lock().ended, 1);

        drop(subscription);
        assert_eq!(session.events().listener_count(), 0);
        session.start();
        session.stop();
        assert_eq!(counter.lock().ended, 1);
    }

    #[test]
    fn test_bus_prunes_dropped_listeners() {
        let bus = SessionEventBus::new();
        let handle: ListenerHandle = Arc::new(Mutex::new(Counter::default()));
        let subscription = bus.subscribe(&handle);
        drop(handle);

        bus.broadcast(SessionEvent::Ended);
        assert_eq!(bus.listener_count(), 0);
        drop(subscription);
    }

    #[test]
    fn test_dropped_session_notifies_end() {
        let counter = Arc::new(Mutex::new(Counter::default()));
        let handle: ListenerHandle = counter.clone();
        let mut session = PlaySession::new();
        let _subscription = session.events().subscribe(&handle);

        session.start();
        drop(session);
        assert_eq!(counter.lock().ended, 1);

        let session = PlaySession::new();
        let _subscription = session.events().subscribe(&handle);
        drop(session);
        assert_eq!(counter.lock().ended, 1);
    }
}
