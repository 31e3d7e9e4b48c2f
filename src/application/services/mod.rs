pub mod auto_sync;
pub mod cache_loader;
pub mod reconciler;
pub mod validation;

pub use auto_sync::AutoSync;
pub use cache_loader::CacheLoader;
pub use reconciler::SyncReconciler;
pub use validation::ValidationService;
