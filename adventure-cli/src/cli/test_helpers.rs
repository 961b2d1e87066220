//! Small helpers shared across CLI tests.

use std::fs;
use std::path::{Path, PathBuf};

use adventure_core::Record;
use adventure_test_support::datasets::SEVEN_ROOMS;
use tempfile::TempDir;

use super::{Cli, CliError, Command, DatasetArgs, ExecutionSummary, GenerateCommand, PlayCommand};
use crate::store;

pub(super) const PREFIX: &str = "rooms.";

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn dataset_args(root: &Path) -> DatasetArgs {
    DatasetArgs {
        dir: root.to_path_buf(),
        prefix: PREFIX.to_owned(),
    }
}

pub(super) fn generate_cli(root: &Path, seed: u64) -> Cli {
    Cli {
        command: Command::Generate(GenerateCommand {
            dataset: dataset_args(root),
            seed: Some(seed),
            max_passes: None,
        }),
    }
}

pub(super) fn play_command(root: &Path) -> PlayCommand {
    PlayCommand {
        dataset: dataset_args(root),
        time_file: root.join("currentTime.txt"),
    }
}

/// Writes the canned seven-room dataset under `root`, optionally editing one
/// record first.
pub(super) fn write_seven_rooms(root: &Path, edit: Option<(&str, &str, &str)>) -> PathBuf {
    let records: Vec<Record> = SEVEN_ROOMS
        .iter()
        .map(|(label, text)| {
            let text = match edit {
                Some((target, from, to)) if target == *label => text.replace(from, to),
                _ => (*text).to_owned(),
            };
            Record::new(*label, text)
        })
        .collect();
    store::write_dataset(root, PREFIX, &records).expect("write canned dataset")
}

pub(super) fn dataset_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("list dataset")
        .map(|entry| {
            entry
                .expect("dataset entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match super::run_cli(cli, std::io::empty(), std::io::sink()) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn expect_generated(summary: ExecutionSummary) -> (PathBuf, u64) {
    match summary {
        ExecutionSummary::Generated { dataset, seed, .. } => (dataset, seed),
        other => panic!("expected generate summary, got {other:?}"),
    }
}
