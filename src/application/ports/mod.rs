pub mod connectivity;
pub mod sync_observer;
pub mod ticket_registry;
pub mod ticket_store;

pub use connectivity::{Connectivity, ConnectivityEvent};
pub use sync_observer::SyncObserver;
pub use ticket_registry::{RedeemOutcome, TicketRegistry};
pub use ticket_store::{LocalRedemption, TicketStore};
