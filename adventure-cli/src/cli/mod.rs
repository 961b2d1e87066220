//! Command-line interface orchestration for the adventure game.
//!
//! `generate` builds a random room graph and writes it as a dataset; `play`
//! loads the newest dataset and runs the interactive game loop.

mod commands;

pub use commands::{
    Cli, CliError, Command, DEFAULT_PREFIX, DatasetArgs, ExecutionSummary, GenerateCommand,
    PlayCommand, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
