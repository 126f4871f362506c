use std::env;

use tracing::Level;
pub use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

pub const LOG_LEVEL_ENV: &str = "EXTRACTION_GATEWAY_LOG_LEVEL";

pub const COMPONENT_LEVELS: &[(&str, Level)] = &[
    ("extraction_gateway", Level::INFO),
    ("request", Level::INFO),
    ("app_backend", Level::INFO),
    ("app_config", Level::INFO),
    ("app_extractors", Level::INFO),
    ("app_helpers", Level::INFO),
    ("app_logger", Level::INFO),
    ("app_tasks", Level::INFO),
];

/// Initialize the logger
///
/// # Panics
/// Panics if the logger fails to initialize
pub fn init() {
    init_with(COMPONENT_LEVELS.to_vec());
}

pub fn init_with<T>(levels: T)
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(build_filter(levels, &env::var(LOG_LEVEL_ENV).unwrap_or_default()))
        .try_init()
        .expect("setting default subscriber failed");
}

/// Component defaults first, then any comma separated directives from the environment
fn build_filter<T>(levels: T, env_directives: &str) -> EnvFilter
where
    T: IntoIterator<Item = (&'static str, Level)>,
{
    let default_levels = levels
        .into_iter()
        .map(|(k, v)| {
            if k.is_empty() {
                v.to_string()
            } else {
                format!("{}={}", k, v)
            }
        })
        .fold(String::new(), |acc, a| format!("{},{}", acc, a));

    let mut base_level = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .parse_lossy(default_levels);

    let env_directives = env_directives
        .split(',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("Failed to parse log level directive {s:?}: {e:?}");
                None
            }
        })
        .collect::<Vec<Directive>>();

    for d in env_directives {
        base_level = base_level.add_directive(d);
    }

    base_level
}
