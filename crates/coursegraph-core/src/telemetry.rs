use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `extra_directives` (e.g.
/// `"tower_http=debug"`) are appended to the configured level.
pub fn init_tracing(logging: &LoggingConfig, extra_directives: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = if extra_directives.is_empty() {
            logging.level.clone()
        } else {
            format!("{},{}", logging.level, extra_directives)
        };
        directives.into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match logging.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {e}");
    }
}

/// Run `f` with a temporary pretty subscriber at `info` (or `RUST_LOG`).
///
/// Used around configuration loading, before the configured subscriber can
/// be installed.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::with_default(subscriber, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::subscriber::NoSubscriber;

    #[test]
    fn bootstrap_logging_is_scoped_to_the_closure() {
        let inside = with_bootstrap_logging(|| {
            tracing::dispatcher::get_default(|dispatch| !dispatch.is::<NoSubscriber>())
        });
        assert!(inside);
        assert_eq!(with_bootstrap_logging(|| 7), 7);
    }
}
