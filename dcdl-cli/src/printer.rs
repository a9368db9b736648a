//! Output of the simulation modes: nothing is downloaded, the messages go to stdout.
use std::io::{self, Write};

use dcdl_common::{message::Message, serde_json};
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// One media URL per line.
    Urls,
    /// Every message as a JSON line.
    Json,
}

/// Writes one message. Returns whether it was a media item.
pub fn print_message<W: Write>(
    out: &mut W,
    msg: &Message,
    mode: PrintMode,
) -> Result<bool, CliError> {
    let is_file = matches!(msg, Message::Url { .. });

    match mode {
        PrintMode::Urls => {
            if let Message::Url { item, .. } = msg {
                writeln!(out, "{}", item.url)?;
            }
        }
        PrintMode::Json => {
            serde_json::to_writer(&mut *out, msg)?;
            writeln!(out)?;
        }
    }

    Ok(is_file)
}

/// Spawns the task printing everything received on `channel_rx`. Resolves to the number of media
/// items seen.
pub fn setup_printer(
    mut channel_rx: UnboundedReceiver<Message>,
    mode: PrintMode,
) -> JoinHandle<Result<u64, CliError>> {
    tokio::spawn(async move {
        let mut files = 0;

        while let Some(msg) = channel_rx.recv().await {
            let mut stdout = io::stdout().lock();
            if print_message(&mut stdout, &msg, mode)? {
                files += 1;
            }
        }

        Ok(files)
    })
}
