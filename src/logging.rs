//! Tracing subscriber setup for the `vault` binary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding an `EnvFilter` directive that overrides `-v`.
pub const LOG_ENV: &str = "VAULTKIT_LOG";

/// Maps the `-v` count to a default filter directive.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "vaultkit=warn",
        1 => "vaultkit=debug",
        _ => "vaultkit=trace",
    }
}

/// Installs a stderr subscriber; `json` switches to JSON lines.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(verbosity: u8, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
