//! Search GitHub users and browse their repositories.

pub mod client;
pub mod config;
pub mod logging;
pub mod models;
pub mod search;
pub mod view;
pub mod viewport;

pub use config::{Config, ConfigError};
pub use models::{Candidate, Repository, ResultSet, SearchUser};
pub use search::{SearchFlow, SearchOutcome, SearchTicket};
pub use viewport::{Dimensions, Layout, Subscription, ViewportTracker};
