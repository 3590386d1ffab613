//! Utilities: logging setup (tracing, stderr only) and verbosity mapping.
//!
//! stdout belongs to the MCP transport while serving, so nothing here ever
//! writes to it.

/// Logging helpers.
pub mod logging {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::filter::LevelFilter;

    /// Map `-v` / `-q` counts to a level. `RUST_LOG` still overrides it.
    pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::ERROR;
        }
        match verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    pub fn env_filter(level: LevelFilter) -> EnvFilter {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    }

    /// Install the global subscriber. A second call is a no-op.
    pub fn init_logging(level: LevelFilter, ansi: bool) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter(level))
            .with_writer(std::io::stderr)
            .with_ansi(ansi)
            .with_target(false)
            .try_init();
    }

}

pub use logging::{derive_level, init_logging};
