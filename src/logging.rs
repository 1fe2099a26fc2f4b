//! Logging and tracing setup for the RBAC policy adapter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PRODUCTION_FILTER: &str = "rbacpolicy_adapter=info";
const DEVELOPMENT_FILTER: &str = "rbacpolicy_adapter=debug,tower_http=debug";

/// Log output style, chosen by the `ENVIRONMENT` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines for log aggregation.
    Production,
    /// Human-readable output with debug detail.
    Development,
}

impl LogFormat {
    pub fn from_environment(environment: Option<&str>) -> Self {
        match environment {
            Some("production") => LogFormat::Production,
            _ => LogFormat::Development,
        }
    }

    fn default_filter(self) -> &'static str {
        match self {
            LogFormat::Production => PRODUCTION_FILTER,
            LogFormat::Development => DEVELOPMENT_FILTER,
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `ENVIRONMENT=production` selects JSON output at info level; anything else
/// selects human-readable output at debug level. `RUST_LOG` overrides the
/// level filter in both cases.
pub fn init() {
    let format = LogFormat::from_environment(std::env::var("ENVIRONMENT").ok().as_deref());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format.default_filter()));

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Production => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
        LogFormat::Development => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init(),
    }
}
