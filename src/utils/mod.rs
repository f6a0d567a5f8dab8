//! Utilities: logging setup (level from -v/-q, `RUST_LOG` override) and
//! terminal detection.
//!
//! Key items:
//!   init_logging / derive_level
//!   stdin_is_interactive

use std::io::IsTerminal;

/// Logging helpers.
pub mod logging {
    use tracing::Level;
    use tracing_subscriber::EnvFilter;

    /// Map `-v` count and `--quiet` to a level for this crate.
    pub fn derive_level(verbose: u8, quiet: bool) -> Level {
        if quiet {
            return Level::ERROR;
        }
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Directive used when `RUST_LOG` is not set. Dependencies stay at warn.
    pub fn default_directive(level: Level) -> String {
        format!(
            "warn,{}={}",
            env!("CARGO_CRATE_NAME"),
            level.as_str().to_ascii_lowercase()
        )
    }

    /// Install the stderr subscriber. Safe to call more than once.
    pub fn init_logging(level: Level) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

pub use logging::{derive_level, init_logging};

/// Whether prompts can be shown.
pub fn stdin_is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(derive_level(2, true), Level::ERROR);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(derive_level(0, false), Level::INFO);
        assert_eq!(derive_level(1, false), Level::DEBUG);
        assert_eq!(derive_level(5, false), Level::TRACE);
    }

    #[test]
    fn default_directive_targets_this_crate() {
        assert_eq!(logging::default_directive(Level::DEBUG), "warn,pcaad=debug");
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(Level::INFO);
        init_logging(Level::TRACE);
    }
}
