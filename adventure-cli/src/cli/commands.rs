//! Command implementations and argument parsing for the adventure CLI.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use adventure_core::{
    BuildError, Catalog, DecodeError, GraphBuilder, Session, SessionError, decode, encode,
};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

use crate::{
    clock::{ArtifactClock, DEFAULT_TIME_FILE, TimeSource},
    game::{self, GameOutcome},
    store::{self, StoreError},
};

/// Default prefix of dataset directory names.
pub const DEFAULT_PREFIX: &str = "adventure.rooms.";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "adventure", about = "Generate random room datasets and play them.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a random room graph and write it as a new dataset.
    Generate(GenerateCommand),
    /// Play the most recently written dataset.
    Play(PlayCommand),
}

/// Where datasets live.
#[derive(Debug, Args, Clone)]
pub struct DatasetArgs {
    /// Directory holding dataset directories.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Prefix of dataset directory names.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Dataset location.
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Seed for a reproducible graph; entropy-seeded when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ceiling on edge construction passes.
    #[arg(long = "max-passes", value_parser = clap::value_parser!(usize))]
    pub max_passes: Option<usize>,
}

/// Options accepted by the `play` command.
#[derive(Debug, Args, Clone)]
pub struct PlayCommand {
    /// Dataset location.
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// File the time query writes and reads back.
    #[arg(long = "time-file", default_value = DEFAULT_TIME_FILE)]
    pub time_file: PathBuf,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Graph construction failed.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The dataset could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The decoded graph cannot host a session.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Reading or writing the dataset failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The game loop could not read input or write output.
    #[error("failed to drive the terminal: {source}")]
    Terminal {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl CliError {
    /// Stable code of the wrapped core error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Build(err) => Some(err.code().as_str()),
            Self::Decode(err) => Some(err.code().as_str()),
            Self::Session(err) => Some(err.code().as_str()),
            Self::Store(_) | Self::Terminal { .. } => None,
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionSummary {
    /// A dataset was written.
    Generated {
        /// Directory holding the new records.
        dataset: PathBuf,
        /// Seed that reproduces the graph.
        seed: u64,
        /// Edge passes construction needed.
        passes: usize,
    },
    /// A game was played.
    Played {
        /// Directory the records were read from.
        dataset: PathBuf,
        /// How the game ended.
        outcome: GameOutcome,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// `input` and `output` carry the interactive game for `play`; `generate`
/// ignores them.
///
/// # Errors
/// Returns [`CliError`] when construction, storage, decoding or the terminal
/// fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use adventure_cli::cli::{Cli, Command, DatasetArgs, ExecutionSummary, GenerateCommand, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         dataset: DatasetArgs {
///             dir: dir.path().to_path_buf(),
///             prefix: "rooms.".into(),
///         },
///         seed: Some(3),
///         max_passes: None,
///     }),
/// };
/// let summary = run_cli(cli, std::io::empty(), std::io::sink())?;
/// assert!(matches!(summary, ExecutionSummary::Generated { seed: 3, .. }));
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli, input, output), fields(command = field::Empty))]
pub fn run_cli<R, W>(cli: Cli, input: R, output: W) -> Result<ExecutionSummary, CliError>
where
    R: BufRead,
    W: Write,
{
    match cli.command {
        Command::Generate(command) => {
            Span::current().record("command", field::display("generate"));
            run_generate(command)
        }
        Command::Play(command) => {
            Span::current().record("command", field::display("play"));
            let mut clock = ArtifactClock::new(command.time_file.clone());
            run_play(command, input, output, &mut clock)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(seed = field::Empty, dataset = field::Empty),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<ExecutionSummary, CliError> {
    let GenerateCommand {
        dataset,
        seed,
        max_passes,
    } = command;

    let mut builder = GraphBuilder::new();
    if let Some(seed) = seed {
        builder = builder.with_rng_seed(seed);
    }
    if let Some(max_passes) = max_passes {
        builder = builder.with_max_passes(max_passes);
    }
    let (graph, stats) = builder.build_with_stats(&Catalog::default())?;

    let span = Span::current();
    span.record("seed", stats.seed);
    let dir = store::write_dataset(&dataset.dir, &dataset.prefix, &encode(&graph))?;
    span.record("dataset", field::display(dir.display()));
    info!(rooms = graph.len(), edges = graph.edge_count(), "dataset generated");

    Ok(ExecutionSummary::Generated {
        dataset: dir,
        seed: stats.seed,
        passes: stats.passes,
    })
}

#[instrument(
    name = "cli.play",
    err,
    skip(command, input, output, clock),
    fields(dataset = field::Empty, records = field::Empty),
)]
pub(super) fn run_play<R, W, T>(
    command: PlayCommand,
    input: R,
    output: W,
    clock: &mut T,
) -> Result<ExecutionSummary, CliError>
where
    R: BufRead,
    W: Write,
    T: TimeSource + ?Sized,
{
    let dir = store::newest_dataset(&command.dataset.dir, &command.dataset.prefix)?;
    let span = Span::current();
    span.record("dataset", field::display(dir.display()));

    let records = store::read_dataset(&dir)?;
    span.record("records", records.len());
    let graph = decode(&records)?;
    for violation in graph.invariants().collect_all() {
        warn!(%violation, "dataset violates a graph invariant");
    }

    let mut session = Session::new(graph)?;
    let outcome = game::play(&mut session, input, output, clock)
        .map_err(|source| CliError::Terminal { source })?;
    info!(?outcome, "game finished");

    Ok(ExecutionSummary::Played {
        dataset: dir,
        outcome,
    })
}

/// Renders the parts of `summary` the game loop has not already printed.
///
/// `generate` reports the dataset directory; `play` has already written its
/// full transcript, so nothing more is printed for it.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use adventure_cli::cli::{ExecutionSummary, render_summary};
/// let summary = ExecutionSummary::Generated {
///     dataset: "rooms.42".into(),
///     seed: 7,
///     passes: 3,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(buffer, b"rooms.42\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Generated { dataset, .. } => writeln!(writer, "{}", dataset.display()),
        ExecutionSummary::Played { .. } => Ok(()),
    }
}
