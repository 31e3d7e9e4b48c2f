pub mod event_id;
pub mod redemption_token;
pub mod sync_state;
pub mod ticket_id;

pub use event_id::EventId;
pub use redemption_token::RedemptionToken;
pub use sync_state::SyncState;
pub use ticket_id::TicketId;
