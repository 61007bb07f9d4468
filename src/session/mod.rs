//! Session replication (non-deterministic edge).
//!
//! Host-authoritative, full-snapshot, last-snapshot-wins replication
//! over an abstract pub/sub channel. The deterministic core never
//! depends on anything in this module.

pub mod invite;
pub mod protocol;
pub mod pubsub;
pub mod replicate;

pub use self::invite::{extract_session_id, invite_link};
pub use self::protocol::{
    PlayerInfo, RunSnapshot, SessionDescriptor, SessionMessage, PROTOCOL_VERSION,
};
pub use self::pubsub::{DescriptorStore, LocalBus, MemoryDescriptorStore, PubSub, StoredDescriptor};
pub use self::replicate::{
    run_host_loop, ClientMirror, HostLoopConfig, HostSession, MirrorEvent, Replicator,
    SessionRole, BROADCAST_INTERVAL_MS,
};
