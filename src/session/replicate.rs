//! Host-Authoritative Replication
//!
//! Exactly one browser context holds the Host role and the one writable
//! [`RunSimulation`]; every other context is a Client holding a
//! [`ClientMirror`], a structurally read-only view with no mutating
//! methods at all. The host broadcasts full snapshots, coalesced to at
//! most one per frame interval, and clients overwrite their mirror
//! wholesale on every `state` message - last snapshot wins.
//!
//! There is no arbitration if two contexts both believe they are Host;
//! that is a documented limitation of the protocol, not a guarantee.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::time::interval;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::content::{ContentError, GameContent};
use crate::game::config::{RosterEntry, RunConfig};
use crate::game::intent::{apply_intent, Intent, IntentError, IntentOutcome};
use crate::game::state::RunSimulation;
use crate::game::tick::tick;
use crate::session::protocol::{
    PlayerInfo, RunSnapshot, SessionDescriptor, SessionMessage, PROTOCOL_VERSION,
};
use crate::session::pubsub::{DescriptorStore, PubSub, StoredDescriptor};

/// Interval between coalesced snapshot broadcasts (a render-frame
/// equivalent; broadcasts are never per-mutation).
pub const BROADCAST_INTERVAL_MS: u64 = 100;

/// The local end's role in a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionRole {
    Idle,
    Host,
    Client,
}

/// The local end of a replicated session.
pub enum Replicator {
    Idle,
    Host(HostSession),
    Client(ClientMirror),
}

impl Replicator {
    /// The current role.
    pub fn role(&self) -> SessionRole {
        match self {
            Replicator::Idle => SessionRole::Idle,
            Replicator::Host(_) => SessionRole::Host,
            Replicator::Client(_) => SessionRole::Client,
        }
    }
}

// =============================================================================
// HOST
// =============================================================================

/// Sole owner of the writable simulation for a session.
pub struct HostSession {
    descriptor: SessionDescriptor,
    sim: RunSimulation,
    bus: Arc<dyn PubSub>,
    dirty: bool,
}

impl HostSession {
    /// Start hosting: construct the run, announce the session, and
    /// persist the durable descriptor for reload recovery.
    pub fn start(
        config: &RunConfig,
        content: &GameContent,
        bus: Arc<dyn PubSub>,
        store: &dyn DescriptorStore,
    ) -> Self {
        let sim = RunSimulation::new(config, content);
        let descriptor = SessionDescriptor {
            session_id: Uuid::new_v4(),
            mode_key: config.mode_key.clone(),
            length_key: config.length_key.clone(),
            seed: config.seed,
            players: sim.players.iter().map(PlayerInfo::capture).collect(),
            party_mode: config.party_mode,
        };

        let _ = bus.publish(SessionMessage::SessionStart {
            session_id: descriptor.session_id,
            config: descriptor.clone(),
        });
        store.save(&StoredDescriptor::new(descriptor.clone()));
        debug!(session = %descriptor.session_id, "hosting session");

        Self {
            descriptor,
            sim,
            bus,
            dirty: true,
        }
    }

    /// This session's id.
    pub fn session_id(&self) -> Uuid {
        self.descriptor.session_id
    }

    /// The immutable session descriptor.
    pub fn descriptor(&self) -> &SessionDescriptor {
        &self.descriptor
    }

    /// Read access to the authoritative simulation.
    pub fn simulation(&self) -> &RunSimulation {
        &self.sim
    }

    /// The bus this session publishes on.
    pub fn bus(&self) -> Arc<dyn PubSub> {
        Arc::clone(&self.bus)
    }

    /// Route a player intent into the simulation. Any accepted intent
    /// marks the snapshot dirty; the next flush broadcasts it.
    pub fn handle_intent(
        &mut self,
        content: &GameContent,
        intent: &Intent,
    ) -> Result<IntentOutcome, IntentError> {
        let outcome = apply_intent(&mut self.sim, content, intent)?;
        self.dirty = true;
        Ok(outcome)
    }

    /// Advance the simulation one tick (host-only).
    pub fn tick(&mut self) {
        tick(&mut self.sim);
        self.dirty = true;
    }

    /// Publish the current snapshot if anything changed since the last
    /// flush. Returns whether a message went out.
    pub fn flush(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        let _ = self.bus.publish(SessionMessage::State {
            session_id: self.descriptor.session_id,
            protocol_version: PROTOCOL_VERSION,
            config: self.descriptor.clone(),
            snapshot: Box::new(RunSnapshot::capture(&self.sim)),
        });
        true
    }

    /// React to channel traffic addressed to this session. A
    /// state-request is an idempotent pull: it re-flags the snapshot so
    /// the next frame rebroadcasts.
    pub fn handle_message(&mut self, message: &SessionMessage) {
        if message.session_id() != self.descriptor.session_id {
            trace!("dropping message for foreign session");
            return;
        }
        if let SessionMessage::StateRequest { .. } = message {
            self.dirty = true;
        }
    }

    /// Replace the run with a fresh one (explicit restart). The session
    /// and its id survive; the new run is announced on the next flush.
    pub fn restart(&mut self, config: &RunConfig, content: &GameContent) {
        self.sim = RunSimulation::new(config, content);
        self.descriptor.seed = config.seed;
        self.descriptor.mode_key = config.mode_key.clone();
        self.descriptor.length_key = config.length_key.clone();
        self.dirty = true;
    }

    /// Tear the session down: announce the end and drop the durable
    /// descriptor.
    pub fn end(self, store: &dyn DescriptorStore) {
        let _ = self.bus.publish(SessionMessage::SessionEnd {
            session_id: self.descriptor.session_id,
        });
        store.clear();
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// What a channel message did to a mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirrorEvent {
    /// A snapshot was applied wholesale.
    Updated,
    /// The host (or a peer) ended the session.
    Ended,
    /// Foreign session, stale protocol, or irrelevant kind; dropped.
    Ignored,
}

/// Read-only mirror of a hosted run.
///
/// Structurally read-only: this type exposes no mutating access to run
/// state, so a client context cannot corrupt the run even by accident -
/// mutation is a compile-time impossibility, not a checked flag. The
/// only way the view changes is a full snapshot from the host.
pub struct ClientMirror {
    descriptor: SessionDescriptor,
    view: RunSnapshot,
    applied_states: u64,
}

impl ClientMirror {
    /// Join a session from its announced descriptor. A provisional run
    /// is reconstructed locally from the shared seed and config so
    /// something renders immediately, before the first snapshot lands.
    pub fn join(
        descriptor: SessionDescriptor,
        content: &GameContent,
    ) -> Result<Self, ContentError> {
        let roster: Vec<RosterEntry> = descriptor
            .players
            .iter()
            .map(|p| RosterEntry {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect();
        let config = content.resolve_config(
            descriptor.seed,
            &descriptor.mode_key,
            &descriptor.length_key,
            roster,
            descriptor.party_mode,
        )?;
        let provisional = RunSimulation::new(&config, content);
        debug!(session = %descriptor.session_id, "joined as client");

        Ok(Self {
            descriptor,
            view: RunSnapshot::capture(&provisional),
            applied_states: 0,
        })
    }

    /// Rejoin from a durable descriptor after a reload, then ask the
    /// host for the current snapshot.
    pub fn rejoin(
        stored: StoredDescriptor,
        content: &GameContent,
        bus: &dyn PubSub,
    ) -> Result<Self, ContentError> {
        let mirror = Self::join(stored.config, content)?;
        mirror.request_state(bus);
        Ok(mirror)
    }

    /// Ask the host to resend the current snapshot. Idempotent.
    pub fn request_state(&self, bus: &dyn PubSub) {
        let _ = bus.publish(SessionMessage::StateRequest {
            session_id: self.descriptor.session_id,
        });
    }

    /// Apply channel traffic. `state` messages for this session replace
    /// the view wholesale - last snapshot received wins, no merging, no
    /// diffing. Everything else is dropped silently.
    pub fn handle_message(&mut self, message: &SessionMessage) -> MirrorEvent {
        if message.session_id() != self.descriptor.session_id {
            trace!("dropping message for foreign session");
            return MirrorEvent::Ignored;
        }
        match message {
            SessionMessage::State {
                protocol_version,
                snapshot,
                ..
            } => {
                if *protocol_version != PROTOCOL_VERSION {
                    trace!(
                        theirs = protocol_version,
                        ours = PROTOCOL_VERSION,
                        "dropping snapshot from mismatched protocol"
                    );
                    return MirrorEvent::Ignored;
                }
                self.view = (**snapshot).clone();
                self.applied_states += 1;
                MirrorEvent::Updated
            }
            SessionMessage::SessionEnd { .. } => MirrorEvent::Ended,
            _ => MirrorEvent::Ignored,
        }
    }

    /// The latest applied (or provisional) snapshot.
    pub fn view(&self) -> &RunSnapshot {
        &self.view
    }

    /// The session descriptor this mirror follows.
    pub fn descriptor(&self) -> &SessionDescriptor {
        &self.descriptor
    }

    /// How many host snapshots have been applied.
    pub fn applied_states(&self) -> u64 {
        self.applied_states
    }
}

// =============================================================================
// HOST DRIVER
// =============================================================================

/// Cadences for the host driver loop.
#[derive(Clone, Copy, Debug)]
pub struct HostLoopConfig {
    /// Simulation tick cadence.
    pub tick_interval: Duration,
    /// Coalesced broadcast cadence.
    pub frame_interval: Duration,
}

impl Default for HostLoopConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(crate::game::config::TICK_INTERVAL_MS),
            frame_interval: Duration::from_millis(BROADCAST_INTERVAL_MS),
        }
    }
}

/// Drive a hosted session: fixed-cadence simulation ticks, coalesced
/// snapshot broadcasts, and state-request replies, until the run ends or
/// `shutdown` fires. The terminal transition stops both the ticker and
/// the broadcaster after one final snapshot carrying the end-of-run
/// summary.
pub async fn run_host_loop(
    host: Arc<Mutex<HostSession>>,
    config: HostLoopConfig,
    mut shutdown: broadcast::Receiver<()>,
) {
    let bus = host.lock().await.bus();
    let mut inbox = bus.subscribe();

    let mut ticker = interval(config.tick_interval);
    let mut frame = interval(config.frame_interval);
    // Consume the immediate first fire of each interval.
    ticker.tick().await;
    frame.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut host = host.lock().await;
                host.tick();
                if host.simulation().game_over {
                    host.flush();
                    break;
                }
            }
            _ = frame.tick() => {
                host.lock().await.flush();
            }
            message = inbox.recv() => {
                match message {
                    Ok(message) => {
                        let mut host = host.lock().await;
                        // A session-end from another context tears the
                        // session down and cancels all scheduling.
                        if matches!(message, SessionMessage::SessionEnd { .. })
                            && message.session_id() == host.session_id()
                        {
                            break;
                        }
                        host.handle_message(&message);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        trace!(skipped, "host inbox lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = shutdown.recv() => {
                host.lock().await.flush();
                break;
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
