//! Terminal event loop.
//!
//! DESIGN
//! ======
//! Lines arrive from a reader thread over a channel. Each line becomes a turn
//! future on the single event-loop thread. In interactive mode new lines are
//! read while a turn is in flight, and the turn lock turns them into no-ops,
//! just like clicks on a disabled button. Piped input runs turns strictly one
//! after another instead, so scripted conversations are not dropped.
//!
//! A line holding only a number selects the matching choice chip of the most
//! recent bot entry; everything else is sent verbatim.

use std::io::Write;

use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::controller::{TurnController, TurnOutcome};
use crate::net::ChatTransport;
use crate::opener::LinkOpener;
use crate::render::{ChoiceSet, RenderSurface, TerminalSurface};

#[cfg(test)]
#[path = "repl_test.rs"]
mod tests;

const LINE_BUFFER: usize = 16;

/// How a line read from the terminal is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    Choice(String),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keep reading while a turn is in flight.
    Interactive,
    /// Finish each turn before reading the next line.
    Sequential,
}

/// Classify one input line against the active choice set.
#[must_use]
pub fn interpret(line: &str, choices: &ChoiceSet) -> Input {
    let trimmed = line.trim();
    if matches!(trimmed, "/quit" | "/exit") {
        return Input::Quit;
    }
    if let Ok(number) = trimmed.parse::<usize>() {
        if let Some(choice) = choices.get(number) {
            return Input::Choice(choice.to_owned());
        }
    }
    Input::Text(line.to_owned())
}

/// Read stdin lines on a dedicated thread.
///
/// A blocking read cannot be cancelled, so the thread is detached rather than
/// tied to the runtime's shutdown.
#[must_use]
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}

/// Drive the controller until `/quit` or end of input.
pub async fn run<T, O, W>(
    controller: &TurnController<T, TerminalSurface<W>, O>,
    mut lines: mpsc::Receiver<String>,
    mode: Mode,
) where
    T: ChatTransport,
    O: LinkOpener,
    W: Write,
{
    let mut turns: FuturesUnordered<LocalBoxFuture<'_, TurnOutcome>> = FuturesUnordered::new();

    loop {
        tokio::select! {
            biased;

            Some(outcome) = turns.next(), if !turns.is_empty() => {
                finish(controller, outcome);
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("input closed");
                    break;
                };
                let input = {
                    let mut surface = controller.surface_mut();
                    surface.line_submitted();
                    interpret(&line, surface.active_choices())
                };
                let turn = match input {
                    Input::Quit => return,
                    Input::Choice(choice) => async move { controller.select_choice(&choice).await }.boxed_local(),
                    Input::Text(text) => async move { controller.submit_turn(&text).await }.boxed_local(),
                };
                match mode {
                    Mode::Interactive => turns.push(turn),
                    Mode::Sequential => finish(controller, turn.await),
                }
            }
        }
    }

    while let Some(outcome) = turns.next().await {
        finish(controller, outcome);
    }
}

fn finish<T, O, W>(controller: &TurnController<T, TerminalSurface<W>, O>, outcome: TurnOutcome)
where
    T: ChatTransport,
    O: LinkOpener,
    W: Write,
{
    debug!(?outcome, "turn finished");
    if outcome == TurnOutcome::Rejected {
        controller.surface_mut().focus_input();
    }
}
