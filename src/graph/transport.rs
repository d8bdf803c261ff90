use std::sync::{
    atomic::{AtomicU64, AtomicU8, Ordering},
    Arc,
};

/// Playback lifecycle of the graph.
///
/// ```text
/// Stopped --attach--> Starting --gain settles--> Playing
///    ^                                              |
///    +------ detach fires ---- Stopping <--stop-----+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransportState {
    Stopped = 0,
    Starting = 1,
    Playing = 2,
    Stopping = 3,
}

impl TransportState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => TransportState::Starting,
            2 => TransportState::Playing,
            3 => TransportState::Stopping,
            _ => TransportState::Stopped,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    state: AtomicU8,
    completed_stops: AtomicU64,
}

/// Read-only view of the graph's transport, safe to poll from any thread.
#[derive(Debug, Clone, Default)]
pub struct TransportHandle(Arc<Shared>);

impl TransportHandle {
    pub fn get(&self) -> TransportState {
        TransportState::from_u8(self.0.state.load(Ordering::Acquire))
    }

    /// How many scheduled detaches the graph had received when it last went
    /// silent. A stop is finished once this reaches its position in the
    /// sequence of stops sent.
    pub fn completed_stops(&self) -> u64 {
        self.0.completed_stops.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, state: TransportState) {
        self.0.state.store(state as u8, Ordering::Release);
    }

    pub(crate) fn complete_stops(&self, count: u64) {
        self.0.completed_stops.store(count, Ordering::Release);
    }
}
