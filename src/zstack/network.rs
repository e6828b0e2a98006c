//! Advisory network state tracked by the command layer.

/// Host-side view of how far bring-up has progressed.
///
/// Advisory only: operations are never refused based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NetworkState {
    /// No reset has been observed.
    #[default]
    Uninitialized,
    /// The peer reported a reset.
    Initialized,
    /// At least one configuration item was written.
    Configured,
    /// A start request was accepted.
    Starting,
    /// A successful start confirm was classified.
    Joined,
}

impl NetworkState {
    /// Advance to `next` unless the state is already past it.
    pub(crate) fn advance(&mut self, next: NetworkState) {
        if next > *self {
            *self = next;
        }
    }
}
