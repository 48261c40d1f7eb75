//! Logging setup.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Setup logging with the given level.
///
/// `RUST_LOG` overrides `level`. Console output is pretty or JSON; set
/// `console` to false while a full-screen dashboard owns the terminal.
/// When `file` is given, records are also appended there and the returned
/// guard must be held until exit to flush them.
pub fn setup_logging(
    level: &str,
    json: bool,
    console: bool,
    file: Option<&Path>,
) -> io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if console {
        if json {
            layers.push(fmt::layer().json().boxed());
        } else {
            layers.push(fmt::layer().pretty().boxed());
        }
    }

    let guard = match file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .init();

    Ok(guard)
}

fn file_appender(path: &Path) -> io::Result<tracing_appender::rolling::RollingFileAppender> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log file path has no file name: {}", path.display()),
        )
    })?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    Ok(tracing_appender::rolling::never(dir, name))
}
