use crate::application::ports::connectivity::{Connectivity, ConnectivityEvent};
use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Connectivity state fed by the embedding application.
///
/// The engine never probes the network itself; whatever reachability signal
/// the host platform has (OS callbacks, a periodic ping, a UI toggle) is
/// pushed in through `set_online` / `set_offline`. Subscribers only see
/// actual transitions.
pub struct SharedConnectivity {
    online: RwLock<bool>,
    events: broadcast::Sender<ConnectivityEvent>,
}

impl SharedConnectivity {
    pub fn new(initially_online: bool) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            online: RwLock::new(initially_online),
            events,
        }
    }

    pub async fn set_online(&self) {
        self.transition(true).await;
    }

    pub async fn set_offline(&self) {
        self.transition(false).await;
    }

    async fn transition(&self, online: bool) {
        let mut state = self.online.write().await;
        if *state == online {
            return;
        }
        *state = online;
        drop(state);

        let event = if online {
            ConnectivityEvent::Online
        } else {
            ConnectivityEvent::Offline
        };
        debug!(target: "mogiri::connectivity", online = online, "connectivity changed");
        // Send only fails when nobody is subscribed, which is fine.
        let _ = self.events.send(event);
    }
}

impl Default for SharedConnectivity {
    fn default() -> Self {
        Self::new(false)
    }
}

#[async_trait]
impl Connectivity for SharedConnectivity {
    async fn is_online(&self) -> bool {
        *self.online.read().await
    }

    fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent> {
        self.events.subscribe()
    }
}
