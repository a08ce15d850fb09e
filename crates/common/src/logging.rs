//! Tracing setup for the Shotform binaries.
//!
//! Logs always go to stderr; stdout is reserved for reports.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Returns `false` when a
/// subscriber was already installed, in which case the existing one stays.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.compact().with_target(true).try_init()
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_keeps_first() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            json: true,
        };
        init_logging(&config);
        assert!(!init_logging(&LoggingConfig::default()));
    }
}
