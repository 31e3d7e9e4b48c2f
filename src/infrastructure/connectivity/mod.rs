pub mod shared;

pub use shared::SharedConnectivity;
