//! Tracing subscriber setup for the CLI.
//!
//! Library code only emits `tracing` events. The binary installs one stderr
//! subscriber: warnings only by default, everything from debug up when debug
//! mode is on (`DECKPULSE_DEBUG` or `RUST_LOG`, see
//! [`is_debug_mode`](super::messages::macros::is_debug_mode)). `RUST_LOG`
//! directives override the default level.

use super::messages::macros::is_debug_mode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn init() {
    let default_level = if is_debug_mode() { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy();

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(is_debug_mode());

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
