//! Logging setup.

use tracing::Level;
use tracing_subscriber::EnvFilter;

const TARGETS: &[&str] = &[
    "quicknote",
    "quicknote_core",
    "quicknote_sqlite",
    "quicknote_files",
];

/// Install a fmt subscriber. `RUST_LOG` wins over `verbosity` when set.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect();
        EnvFilter::new(directives.join(","))
    });

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
