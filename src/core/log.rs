use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "euribor_update";

/// Per-target filter: the crate logs at debug when verbose, while HTTP
/// dependencies (reqwest, hyper) are capped at warn so a verbose run shows
/// connection problems without their per-request debug chatter.
fn app_targets(verbose: bool) -> Targets {
    let app_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    let dependency_level = if verbose {
        LevelFilter::WARN
    } else {
        LevelFilter::OFF
    };
    Targets::new()
        .with_target(APP_TARGET, app_level)
        .with_default(dependency_level)
}

pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "off" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(app_targets(verbose))
        .with(env_filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_verbose_enables_app_debug_and_dependency_warnings() {
        let targets = app_targets(true);
        assert!(targets.would_enable("euribor_update::providers::ecb", &Level::DEBUG));
        assert!(targets.would_enable("reqwest::connect", &Level::WARN));
        assert!(!targets.would_enable("hyper_util::client", &Level::DEBUG));
    }

    #[test]
    fn test_quiet_disables_everything() {
        let targets = app_targets(false);
        assert!(!targets.would_enable("euribor_update", &Level::ERROR));
        assert!(!targets.would_enable("reqwest", &Level::ERROR));
    }
}
