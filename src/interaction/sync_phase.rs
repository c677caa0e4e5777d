use serde::{Deserialize, Serialize};

/// Handshake progress of a coordination unit.
///
/// A unit is `AwaitingPeer` between mounting and the first message from a
/// counterpart, and returns to `Unmounted` once it detaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncPhase {
    #[default]
    Unmounted,
    AwaitingPeer,
    Synced,
}

impl SyncPhase {
    #[must_use]
    pub fn is_mounted(self) -> bool {
        !matches!(self, Self::Unmounted)
    }

    /// Phase after a peer message arrived. Unmounted units stay unmounted.
    #[must_use]
    pub fn on_peer_message(self) -> Self {
        match self {
            Self::Unmounted => Self::Unmounted,
            Self::AwaitingPeer | Self::Synced => Self::Synced,
        }
    }
}
