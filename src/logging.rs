//! Subscriber setup for the `aliascat` binary.

use std::env;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding `EnvFilter` directives.
pub const ENV_LOG: &str = "ALIASCAT_LOG";

/// Default level for a `-v` count: warnings only, then debug, then trace.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build the filter for a `-v` count and a directive string.
///
/// Valid directives replace the `-v` default entirely; an empty string, or one
/// where every directive fails to parse, leaves the default in place.
pub fn env_filter(verbose: u8, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_for_verbosity(verbose).into())
        .parse_lossy(directives)
}

/// Install a stderr `fmt` subscriber filtered by `ALIASCAT_LOG` and the `-v`
/// count. A subscriber that is already installed is left alone.
pub fn init_logging(verbose: u8) {
    let directives = env::var(ENV_LOG).unwrap_or_default();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, &directives))
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(level_for_verbosity(0), LevelFilter::WARN);
        assert_eq!(level_for_verbosity(1), LevelFilter::DEBUG);
        assert_eq!(level_for_verbosity(5), LevelFilter::TRACE);
    }

    #[test]
    fn verbosity_is_the_default_filter() {
        assert_eq!(env_filter(0, "").to_string(), "warn");
        assert_eq!(env_filter(1, "").to_string(), "debug");
        assert_eq!(env_filter(2, "").to_string(), "trace");
    }

    #[test]
    fn directives_replace_verbosity_default() {
        assert_eq!(env_filter(0, "aliascat=trace").to_string(), "aliascat=trace");
        assert_eq!(env_filter(2, "info").to_string(), "info");
    }

    #[test]
    fn invalid_directives_fall_back_to_verbosity() {
        assert_eq!(env_filter(1, "aliascat=loud").to_string(), "debug");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(0);
        init_logging(2);
    }
}
