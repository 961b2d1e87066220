//! Dataset directories on disk.
//!
//! A dataset is one directory named `<prefix><pid>` holding one file per room
//! record, named by the record label.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::SystemTime;

use adventure_core::Record;
use thiserror::Error;
use tracing::{Span, debug, field, instrument};

/// Errors raised while writing or discovering datasets.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// No directory under the root carries the dataset prefix.
    #[error("no dataset matching `{prefix}*` found in `{root}`")]
    NoDataset {
        /// Directory that was searched.
        root: PathBuf,
        /// Prefix dataset directories must start with.
        prefix: String,
    },
    /// A record file name is not valid UTF-8 and cannot become a label.
    #[error("record file name `{path}` is not valid UTF-8")]
    NonUtf8Label {
        /// Offending file.
        path: PathBuf,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `records` into `<root>/<prefix><pid>` and returns that directory.
///
/// The directory is created if missing and reused otherwise. In a reused
/// directory, files with the same label are overwritten and regular files
/// whose names are not among the new labels are removed, so a later
/// [`read_dataset`] sees exactly `records`.
///
/// # Errors
/// Returns [`StoreError::Io`] if the directory or a record file cannot be
/// written.
#[instrument(name = "store.write", err, skip(records), fields(records = records.len(), dir = field::Empty))]
pub fn write_dataset(root: &Path, prefix: &str, records: &[Record]) -> Result<PathBuf, StoreError> {
    let dir = root.join(format!("{prefix}{}", process::id()));
    Span::current().record("dir", field::display(dir.display()));
    fs::create_dir_all(&dir).map_err(io_error(&dir))?;
    let labels: HashSet<&str> = records.iter().map(Record::label).collect();
    let removed = remove_stale_records(&dir, &labels)?;
    if removed > 0 {
        debug!(removed, "removed records from an earlier generation");
    }
    for record in records {
        let path = dir.join(record.label());
        fs::write(&path, record.text()).map_err(io_error(&path))?;
    }
    debug!("dataset written");
    Ok(dir)
}

fn remove_stale_records(dir: &Path, keep: &HashSet<&str>) -> Result<usize, StoreError> {
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        if !entry.file_type().map_err(io_error(&path))?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().is_some_and(|label| keep.contains(label)) {
            continue;
        }
        fs::remove_file(&path).map_err(io_error(&path))?;
        removed += 1;
    }
    Ok(removed)
}

/// Returns the most recently modified directory under `root` whose name starts
/// with `prefix`. Ties on modification time go to the greater name.
///
/// # Errors
/// Returns [`StoreError::NoDataset`] when nothing matches and
/// [`StoreError::Io`] when `root` cannot be listed.
#[instrument(name = "store.newest", err)]
pub fn newest_dataset(root: &Path, prefix: &str) -> Result<PathBuf, StoreError> {
    let mut newest: Option<(SystemTime, String, PathBuf)> = None;
    for entry in fs::read_dir(root).map_err(io_error(root))? {
        let entry = entry.map_err(io_error(root))?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !name.starts_with(prefix) {
            continue;
        }
        let path = entry.path();
        let metadata = entry.metadata().map_err(io_error(&path))?;
        if !metadata.is_dir() {
            continue;
        }
        let modified = metadata.modified().map_err(io_error(&path))?;
        let candidate = (modified, name, path);
        if newest
            .as_ref()
            .is_none_or(|current| (&candidate.0, &candidate.1) > (&current.0, &current.1))
        {
            newest = Some(candidate);
        }
    }

    newest
        .map(|(_, _, path)| path)
        .ok_or_else(|| StoreError::NoDataset {
            root: root.to_path_buf(),
            prefix: prefix.to_owned(),
        })
}

/// Reads every regular file in `dir` as a record, sorted by label.
///
/// # Errors
/// Returns [`StoreError::Io`] when the directory or a file cannot be read
/// (including files that are not UTF-8 text) and
/// [`StoreError::NonUtf8Label`] for file names that cannot be labels.
#[instrument(name = "store.read", err, fields(records = field::Empty))]
pub fn read_dataset(dir: &Path) -> Result<Vec<Record>, StoreError> {
    let mut records = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(io_error(&path))?;
        if !file_type.is_file() {
            continue;
        }
        let Some(label) = entry.file_name().to_str().map(str::to_owned) else {
            return Err(StoreError::NonUtf8Label { path });
        };
        let text = fs::read_to_string(&path).map_err(io_error(&path))?;
        records.push(Record::new(label, text));
    }
    records.sort_by(|left, right| left.label().cmp(right.label()));
    Span::current().record("records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::time::Duration;

    use adventure_core::{Catalog, GraphBuilder, decode, encode};
    use rstest::rstest;
    use tempfile::TempDir;

    fn temp_dir() -> TempDir {
        match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => panic!("failed to create temp dir: {err}"),
        }
    }

    fn set_modified(path: &Path, seconds_ago: u64) {
        let time = SystemTime::now() - Duration::from_secs(seconds_ago);
        File::open(path)
            .and_then(|dir| dir.set_modified(time))
            .expect("set directory mtime");
    }

    #[rstest]
    fn write_then_read_returns_sorted_records() {
        let root = temp_dir();
        let records = [
            Record::new("Lake_Room", "ROOM NAME: Lake\n"),
            Record::new("Beach_Room", "ROOM NAME: Beach\n"),
        ];
        let dir = write_dataset(root.path(), "rooms.", &records).expect("write dataset");
        assert_eq!(
            dir.file_name().and_then(|name| name.to_str()),
            Some(format!("rooms.{}", process::id()).as_str())
        );

        let read = read_dataset(&dir).expect("read dataset");
        let labels: Vec<&str> = read.iter().map(Record::label).collect();
        assert_eq!(labels, ["Beach_Room", "Lake_Room"]);
        assert_eq!(read[1].text(), "ROOM NAME: Lake\n");
    }

    #[rstest]
    fn rewriting_reuses_directory_and_drops_earlier_records() {
        let root = temp_dir();
        let first = write_dataset(
            root.path(),
            "rooms.",
            &[
                Record::new("Beach_Room", "one"),
                Record::new("Lake_Room", "one"),
                Record::new("Ocean_Room", "one"),
            ],
        )
        .expect("first write");
        fs::create_dir(first.join("nested")).expect("create nested dir");

        let second = write_dataset(
            root.path(),
            "rooms.",
            &[Record::new("Lake_Room", "two"), Record::new("Field_Room", "two")],
        )
        .expect("second write");
        assert_eq!(first, second);
        let read = read_dataset(&second).expect("read dataset");
        assert_eq!(
            read,
            [Record::new("Field_Room", "two"), Record::new("Lake_Room", "two")]
        );
        assert!(second.join("nested").is_dir());
    }

    #[rstest]
    fn regenerating_into_a_reused_directory_decodes_the_new_graph() {
        let root = temp_dir();
        let catalog = |names: [&'static str; 7]| {
            Catalog::new(names.map(|name| (name, name))).expect("seven distinct names")
        };
        let first = GraphBuilder::new()
            .with_rng_seed(1)
            .build(&catalog(["A", "B", "C", "D", "E", "F", "G"]))
            .expect("first build");
        let second = GraphBuilder::new()
            .with_rng_seed(1)
            .build(&catalog(["H", "I", "J", "K", "L", "M", "N"]))
            .expect("second build");

        write_dataset(root.path(), "rooms.", &encode(&first)).expect("first write");
        let dir = write_dataset(root.path(), "rooms.", &encode(&second)).expect("second write");

        let records = read_dataset(&dir).expect("read dataset");
        assert_eq!(records.len(), 7);
        let decoded = decode(&records).expect("only the second graph remains");
        assert!(decoded.structurally_eq(&second));
    }

    #[rstest]
    fn newest_dataset_prefers_latest_mtime() {
        let root = temp_dir();
        for (name, age) in [("rooms.1", 300), ("rooms.2", 10), ("rooms.3", 120)] {
            let dir = root.path().join(name);
            fs::create_dir(&dir).expect("create dataset dir");
            set_modified(&dir, age);
        }
        fs::create_dir(root.path().join("other.9")).expect("create unrelated dir");
        fs::write(root.path().join("rooms.file"), "not a dir").expect("create stray file");

        let newest = newest_dataset(root.path(), "rooms.").expect("dataset exists");
        assert_eq!(newest, root.path().join("rooms.2"));
    }

    #[rstest]
    fn newest_dataset_reports_missing() {
        let root = temp_dir();
        fs::create_dir(root.path().join("other.1")).expect("create unrelated dir");
        let err = newest_dataset(root.path(), "rooms.").expect_err("nothing matches");
        assert!(matches!(err, StoreError::NoDataset { prefix, .. } if prefix == "rooms."));
    }

    #[rstest]
    fn read_dataset_skips_subdirectories() {
        let root = temp_dir();
        fs::write(root.path().join("A_Room"), "text").expect("write record");
        fs::create_dir(root.path().join("nested")).expect("create nested dir");
        let records = read_dataset(root.path()).expect("read dataset");
        assert_eq!(records, [Record::new("A_Room", "text")]);
    }

    #[rstest]
    fn missing_root_is_io_error_with_path() {
        let root = temp_dir();
        let missing = root.path().join("absent");
        match read_dataset(&missing).expect_err("directory is missing") {
            StoreError::Io { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
