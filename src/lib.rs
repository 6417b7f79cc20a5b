#![forbid(unsafe_code)]

//! Builds the chorus quiz dataset from a YouTube channel.
//!
//! The job runs in two binaries: `fetch_channel` downloads raw video metadata
//! into a cache file, and `build_quiz` ranks, cleans and classifies the cached
//! videos into the table the quiz app loads, then checks it for attribute
//! collisions.

pub mod attributes;
pub mod build;
pub mod config;
pub mod consistency;
pub mod error;
pub mod fetch;
pub mod labels;
pub mod mapping;
pub mod metadata;
pub mod normalize;
pub mod persist;
pub mod youtube;

/// Installs the `tracing` subscriber used by every binary. `RUST_LOG`
/// overrides the default filter.
pub fn init_logging(binary: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("chorus_quiz_tools=info,{binary}=info").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
