use async_trait::async_trait;
use tokio::sync::broadcast;

/// Connectivity transition published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

/// Injected connectivity signal.
///
/// `is_online` answers "is a sync attempt worth making right now" and is
/// necessary but not sufficient: a request can still fail after it returns
/// true, and callers handle that as an ordinary remote failure.
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;

    /// Subscribes to connectivity transitions. Only actual transitions are
    /// published; repeated reports of the same state produce no event.
    fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent>;
}
