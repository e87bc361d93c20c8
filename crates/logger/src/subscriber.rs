use std::env::var;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    Layer, Registry, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install the global subscriber at INFO, overridable through `RUST_LOG`.
///
/// Panics if a global subscriber is already set; use [`try_init_tracing`] where that may
/// happen (tests).
pub fn init_tracing() {
    init_tracing_with_level(LevelFilter::INFO);
}

/// Same as [`init_tracing`] with a caller-chosen default level.
pub fn init_tracing_with_level(level: LevelFilter) {
    tracing_subscriber::registry().with(log_layer(level)).init();
}

/// Install the global subscriber unless one is already present.
pub fn try_init_tracing() -> bool {
    tracing_subscriber::registry().with(log_layer(LevelFilter::INFO)).try_init().is_ok()
}

/// Output flavour selected by `RUST_LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    /// One JSON object per line, for log shippers
    Json,
    /// Human-readable single lines without timestamps
    Compact,
}

impl LogFormat {
    fn from_env() -> Self {
        Self::parse(var("RUST_LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Both formats erase to one boxed layer so every init path shares the same registry setup.
fn log_layer(level: LevelFilter) -> Box<dyn Layer<Registry> + Send + Sync> {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    let fmt = tracing_subscriber::fmt::layer();

    match LogFormat::from_env() {
        LogFormat::Json => fmt.json().with_filter(env_filter).boxed(),
        LogFormat::Compact => fmt.compact().without_time().with_filter(env_filter).boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("pretty")), LogFormat::Compact);
        assert_eq!(LogFormat::parse(None), LogFormat::Compact);
    }

    #[test]
    fn test_try_init_is_idempotent() {
        try_init_tracing();
        assert!(!try_init_tracing());
    }
}
