pub mod api;
pub mod config;
pub mod dashboard;
pub mod metrics;
pub mod models;
pub mod mutation;
pub mod paging;
pub mod poller;
pub mod stats;

pub use api::{ClickDetectionClient, PostMonitorClient, TransportError};
pub use config::Config;
pub use dashboard::Dashboard;
pub use paging::Pager;
pub use poller::{Poller, PollerConfig, PollerState};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes tracing and a panic hook for the binary.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(EnvFilter::from_default_env()))
        .init();

    // reports to stderr without requiring tracing macros on panic
    let default = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |pi| {
        eprintln!("panic: {}", pi);
        default(pi);
    }));
}
