//! Time-query side channel.
//!
//! A worker thread formats the local time and writes it to an artifact file.
//! The caller joins the worker before reading the artifact back, so the read
//! always observes the completed write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;

use chrono::Local;
use thiserror::Error;
use tracing::{debug, instrument};

/// `strftime` pattern for the reported time, e.g.
/// `01:03pm, Monday, October 19, 2026`.
pub const TIME_FORMAT: &str = "%I:%M%P, %A, %B %d, %Y";

/// Default artifact file name.
pub const DEFAULT_TIME_FILE: &str = "currentTime.txt";

/// Errors raised while producing or consuming the time artifact.
#[derive(Debug, Error)]
pub enum TimeQueryError {
    /// The worker thread could not be started.
    #[error("failed to start time worker: {source}")]
    Spawn {
        /// Error raised by the thread builder.
        #[source]
        source: io::Error,
    },
    /// The worker thread panicked before signalling completion.
    #[error("time worker panicked")]
    WorkerPanicked,
    /// The worker could not write the artifact.
    #[error("failed to write time artifact `{path}`: {source}")]
    Write {
        /// Artifact path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The artifact could not be read back.
    #[error("failed to read time artifact `{path}`: {source}")]
    Read {
        /// Artifact path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The artifact held no line to report.
    #[error("time artifact `{path}` is empty")]
    Empty {
        /// Artifact path.
        path: PathBuf,
    },
}

/// Something that can answer a time query.
pub trait TimeSource {
    /// Returns one human-readable timestamp line.
    ///
    /// # Errors
    /// Returns [`TimeQueryError`] when the time cannot be produced.
    fn current_time(&mut self) -> Result<String, TimeQueryError>;
}

/// [`TimeSource`] backed by [`query_time`] and an artifact file.
#[derive(Clone, Debug)]
pub struct ArtifactClock {
    artifact: PathBuf,
}

impl ArtifactClock {
    /// Creates a clock writing to `artifact`.
    pub fn new(artifact: impl Into<PathBuf>) -> Self {
        Self {
            artifact: artifact.into(),
        }
    }

    /// Path of the artifact file.
    #[must_use]
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }
}

impl TimeSource for ArtifactClock {
    fn current_time(&mut self) -> Result<String, TimeQueryError> {
        query_time(&self.artifact, format_local_time)
    }
}

/// Formats the current local time with [`TIME_FORMAT`].
#[must_use]
pub fn format_local_time() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

/// Runs `formatter` on a worker thread that writes its output plus a newline
/// to `artifact`, waits for the worker, then returns the artifact's first line.
///
/// # Errors
/// Returns [`TimeQueryError`] if the worker cannot start, panics, or fails to
/// write, or if the artifact cannot be read back or is empty.
///
/// # Examples
/// ```
/// use adventure_cli::clock::query_time;
///
/// let dir = tempfile::tempdir()?;
/// let artifact = dir.path().join("currentTime.txt");
/// let line = query_time(&artifact, || "01:03pm, Monday, October 19, 2026".to_owned())?;
/// assert_eq!(line, "01:03pm, Monday, October 19, 2026");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(name = "clock.query", err, skip(formatter))]
pub fn query_time<F>(artifact: &Path, formatter: F) -> Result<String, TimeQueryError>
where
    F: FnOnce() -> String + Send + 'static,
{
    let path = artifact.to_path_buf();
    let worker = thread::Builder::new()
        .name("time-query".to_owned())
        .spawn(move || {
            let line = formatter();
            fs::write(&path, format!("{line}\n"))
                .map_err(|source| TimeQueryError::Write { path, source })
        })
        .map_err(|source| TimeQueryError::Spawn { source })?;

    worker
        .join()
        .map_err(|_| TimeQueryError::WorkerPanicked)??;
    debug!("time worker finished");

    let contents = fs::read_to_string(artifact).map_err(|source| TimeQueryError::Read {
        path: artifact.to_path_buf(),
        source,
    })?;
    contents
        .lines()
        .next()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| TimeQueryError::Empty {
            path: artifact.to_path_buf(),
        })
}
