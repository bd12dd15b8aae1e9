use std::path::{Path, PathBuf};

use tracing_core::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry;

/// Installs an application logger for the lifetime of the run.
pub trait ApplicationLoggerInstaller: Send {
    /// Install the logger.
    fn install(&self) -> Result<(), String>;
}

/// Application logger writing to a file, with a panic hook pointing at it.
pub struct FileApplicationLoggerInstaller {
    path: PathBuf,
}

impl FileApplicationLoggerInstaller {
    /// Create a new installer writing to the given file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ApplicationLoggerInstaller for FileApplicationLoggerInstaller {
    fn install(&self) -> Result<(), String> {
        let writer = tracing_appender::rolling::never(
            self.path.parent().unwrap_or_else(|| Path::new(".")),
            self.path
                .file_name()
                .ok_or("The path should point to a file.")?,
        );
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(LevelFilter::INFO);

        if registry().with(layer).try_init().is_err() {
            return Err("Failed to update the global tracing subscriber".to_string());
        }

        let hook = std::panic::take_hook();
        let file_path = self.path.display().to_string();

        std::panic::set_hook(Box::new(move |info| {
            log::error!("PANIC => {}", info);
            eprintln!(
                "=== PANIC ===\nA fatal error happened, you can check the experiment logs here => \
                 '{file_path}'\n============="
            );
            hook(info);
        }));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_fails_without_clobbering_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let installer = FileApplicationLoggerInstaller::new(dir.path().join("experiment.log"));

        assert!(installer.install().is_ok());
        assert!(installer.install().is_err());
    }

    #[test]
    fn rejects_paths_without_a_file_name() {
        let installer = FileApplicationLoggerInstaller::new("/");

        assert!(installer.install().is_err());
    }
}
