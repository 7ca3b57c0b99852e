use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing setup for whatever binary embeds the core. `RUST_LOG` wins;
/// otherwise the workspace crates log at debug.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "summit_engine=debug,summit_catalog=debug,summit_booking=debug,summit_credits=debug,summit_store=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
