use crate::settings::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_level(settings: &Settings) -> &'static str {
    if settings.quiet {
        "error"
    } else if settings.debug {
        "debug"
    } else if settings.verbose {
        "info"
    } else {
        "warn"
    }
}

pub fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(settings)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn settings(quiet: bool, verbose: bool, debug: bool) -> Settings {
        Settings {
            connection: String::new(),
            base_dir: PathBuf::new(),
            timeout: Duration::from_secs(1),
            remote: String::new(),
            quiet,
            verbose,
            debug,
        }
    }

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(&settings(false, false, false)), "warn");
        assert_eq!(default_level(&settings(false, true, false)), "info");
        assert_eq!(default_level(&settings(false, true, true)), "debug");
        assert_eq!(default_level(&settings(true, true, true)), "error");
    }
}
