//! Interactive game loop over a traversal session.

use std::io::{self, BufRead, Write};

use adventure_core::{MoveOutcome, Session};
use tracing::{debug, info, warn};

use crate::clock::TimeSource;

/// Input token that asks for the current time instead of moving.
pub const TIME_COMMAND: &str = "time";

const UNKNOWN_ROOM: &str = "HUH? I DON’T UNDERSTAND THAT ROOM. TRY AGAIN.";
const TIME_UNAVAILABLE: &str = "time unavailable";

/// How an interactive game ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameOutcome {
    /// The end room was reached after `steps` moves.
    Won {
        /// Moves taken.
        steps: usize,
    },
    /// Input ended before the end room was reached.
    Abandoned,
}

/// Plays `session` reading commands from `input` and writing prompts to
/// `output` until the end room is reached or input runs out.
///
/// Each line's first whitespace-separated token is the command; blank lines
/// are skipped. A neighbour name moves there. [`TIME_COMMAND`] queries `clock` unless a neighbour is
/// literally named `time`. Anything else is rejected and the prompt repeats.
///
/// # Errors
/// Returns [`io::Error`] if reading input or writing output fails. Time
/// query failures are reported to the player and do not end the game.
///
/// # Examples
/// ```
/// use adventure_cli::{
///     clock::{TimeQueryError, TimeSource},
///     game::{GameOutcome, play},
/// };
/// use adventure_core::{Record, Session, decode};
///
/// struct Fixed;
/// impl TimeSource for Fixed {
///     fn current_time(&mut self) -> Result<String, TimeQueryError> {
///         Ok("noon".to_owned())
///     }
/// }
///
/// let graph = decode(&[
///     Record::new("a", "ROOM NAME: A\nCONNECTION 1: B\nROOM TYPE: START_ROOM\n"),
///     Record::new("b", "ROOM NAME: B\nCONNECTION 1: A\nROOM TYPE: END_ROOM\n"),
/// ])?;
/// let mut session = Session::new(graph)?;
/// let mut output = Vec::new();
/// let outcome = play(&mut session, "B\n".as_bytes(), &mut output, &mut Fixed)?;
/// assert_eq!(outcome, GameOutcome::Won { steps: 1 });
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn play<R, W, T>(
    session: &mut Session,
    mut input: R,
    mut output: W,
    clock: &mut T,
) -> io::Result<GameOutcome>
where
    R: BufRead,
    W: Write,
    T: TimeSource + ?Sized,
{
    let mut line = String::new();
    loop {
        write_prompt(session, &mut output)?;
        let Some(command) = next_command(&mut input, &mut line)? else {
            writeln!(output)?;
            output.flush()?;
            info!(steps = session.steps(), "input ended before the end room");
            return Ok(GameOutcome::Abandoned);
        };
        writeln!(output)?;

        match session.move_to(command) {
            MoveOutcome::Moved { won: true } => {
                write_victory(session, &mut output)?;
                output.flush()?;
                return Ok(GameOutcome::Won {
                    steps: session.steps(),
                });
            }
            MoveOutcome::Moved { won: false } => {
                debug!(room = command, "moved");
            }
            MoveOutcome::Rejected if command == TIME_COMMAND => {
                let report = match clock.current_time() {
                    Ok(time) => time,
                    Err(err) => {
                        warn!(error = %err, "time query failed");
                        TIME_UNAVAILABLE.to_owned()
                    }
                };
                writeln!(output, "{report}\n")?;
            }
            MoveOutcome::Rejected => {
                writeln!(output, "{UNKNOWN_ROOM}\n")?;
            }
            MoveOutcome::AlreadyWon => {
                return Ok(GameOutcome::Won {
                    steps: session.steps(),
                });
            }
        }
    }
}

/// Reads lines until one holds a token and returns that token, or `None` at
/// end of input. Blank lines are skipped without a reply.
fn next_command<'l>(
    input: &mut impl BufRead,
    line: &'l mut String,
) -> io::Result<Option<&'l str>> {
    loop {
        line.clear();
        if input.read_line(line)? == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            break;
        }
    }
    Ok(line.split_whitespace().next())
}

fn write_prompt(session: &Session, output: &mut impl Write) -> io::Result<()> {
    let here = session.describe_current();
    writeln!(output, "CURRENT LOCATION: {}", here.name)?;
    writeln!(output, "POSSIBLE CONNECTIONS: {}.", here.neighbours.join(", "))?;
    write!(output, "WHERE TO? >")?;
    output.flush()
}

fn write_victory(session: &Session, output: &mut impl Write) -> io::Result<()> {
    writeln!(output, "YOU HAVE FOUND THE END ROOM. CONGRATULATIONS!")?;
    writeln!(
        output,
        "YOU TOOK {} STEPS. YOUR PATH TO VICTORY WAS:",
        session.steps()
    )?;
    for room in session.path_taken() {
        writeln!(output, "{room}")?;
    }
    Ok(())
}
