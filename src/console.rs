//! Local console mode.
//!
//! Reads newline-delimited commands from one input stream and writes one
//! result line per command to one output stream. There is a single implicit
//! session and no room involved.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::Result;
use crate::interpreter::Interpreter;

/// Interprets every non-blank line of `input` until end of stream.
///
/// Returns the number of commands handled.
pub async fn run_console<R, W>(interpreter: &Interpreter, input: R, mut output: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let outcome = interpreter.execute(&line);
        debug!(input = %line, ok = outcome.is_success(), "processed");

        output.write_all(outcome.to_string().as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
        handled += 1;
    }

    Ok(handled)
}
