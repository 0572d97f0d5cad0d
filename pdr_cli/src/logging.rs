//! Tracing setup: pretty console output filtered by `RUST_LOG` or the CLI
//! level, plus an optional JSON-lines file sink with rotation from the
//! `[logging]` config section.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::FILE_GUARD;

pub fn init(level: &str, logging: &pdr_config::Logging) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = logging.file.as_deref().map(|path| {
        let p = std::path::Path::new(path);
        let dir = match p.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => std::path::Path::new("."),
        };
        let name = p
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("pdr.log"));
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        // Keep the worker alive for the process lifetime.
        let _ = FILE_GUARD.set(guard);
        fmt::layer().json().with_writer(writer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();
}
