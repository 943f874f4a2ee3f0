//! Obligations of any reconciler built on the environment contract:
//! admission, version conversion and conflict-safe status writes.

pub mod admission;
pub mod config;
pub mod controller;
pub mod runtime;
pub mod store;

use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init_tracing(default_env: &str) {
    let default_directive = default_env
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    let filter = EnvFilter::builder()
        .with_default_directive(default_directive)
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init();
}
