/// Installs the global tracing subscriber.
///
/// Filter defaults to `mogiri=debug,info` and can be overridden through
/// `RUST_LOG`. Safe to call once per process; embedding applications that
/// install their own subscriber should skip this.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mogiri=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
