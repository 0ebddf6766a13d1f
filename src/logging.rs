//! Tracing setup. `.env` is loaded before the filter is read so `RUST_LOG`
//! may live there.

use std::path::Path;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "github_repo_search=info";

/// Loads `.env` from the working directory (or a parent) and installs the
/// global subscriber, writing to stderr.
pub fn init() {
    install(load_filter(None));
}

/// Loads the dotenv file into the process environment, then builds the
/// filter. `None` searches the working directory and its parents.
pub fn load_filter(dotenv_path: Option<&Path>) -> EnvFilter {
    match dotenv_path {
        Some(path) => dotenvy::from_path(path).ok(),
        None => dotenvy::dotenv().ok().map(|_| ()),
    };
    env_filter()
}

/// `RUST_LOG`, or [`DEFAULT_FILTER`] when unset or unparsable.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

fn install(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
