//! Line commands read from stdin.

use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use relay_core::Msg;
use relay_logging::{relay_info, relay_warn};

/// Anything the main loop can be woken with besides engine events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppInput {
    Msg(Msg),
    Status,
    Help,
    Unknown(String),
    Quit,
}

pub const HELP: &str = "commands: connect (c), disconnect (d), clear, status (s), help (?), quit (q)";

/// Maps one input line to an [`AppInput`]. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<AppInput> {
    let word = line.trim();
    if word.is_empty() {
        return None;
    }
    let input = match word.to_ascii_lowercase().as_str() {
        "connect" | "c" => AppInput::Msg(Msg::ConnectClicked),
        "disconnect" | "d" => AppInput::Msg(Msg::DisconnectClicked),
        "clear" => AppInput::Msg(Msg::ClearClicked),
        "status" | "s" => AppInput::Status,
        "help" | "?" => AppInput::Help,
        "quit" | "q" | "exit" => AppInput::Quit,
        _ => AppInput::Unknown(word.to_string()),
    };
    Some(input)
}

/// What reaching the end of stdin means for the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinEof {
    Quit,
    /// Keep streaming until `quit` arrives some other way (Ctrl-C).
    KeepRunning,
}

impl StdinEof {
    /// A session started with `--connect` may run headless with stdin closed.
    pub fn for_session(auto_connect: bool) -> Self {
        if auto_connect {
            StdinEof::KeepRunning
        } else {
            StdinEof::Quit
        }
    }

    pub fn input(self) -> Option<AppInput> {
        match self {
            StdinEof::Quit => Some(AppInput::Quit),
            StdinEof::KeepRunning => None,
        }
    }
}

/// Forwards parsed stdin lines to `tx`; `on_eof` decides what end of input sends.
pub fn spawn_stdin_reader(tx: mpsc::Sender<AppInput>, on_eof: StdinEof) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    relay_warn!("stdin read failed: {}", err);
                    break;
                }
            };
            if let Some(input) = parse_command(&line) {
                let quit = input == AppInput::Quit;
                if tx.send(input).is_err() || quit {
                    return;
                }
            }
        }
        match on_eof.input() {
            Some(input) => {
                let _ = tx.send(input);
            }
            None => relay_info!("stdin closed; streaming until interrupted"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse_command("connect"), Some(AppInput::Msg(Msg::ConnectClicked)));
        assert_eq!(parse_command("  D \n"), Some(AppInput::Msg(Msg::DisconnectClicked)));
        assert_eq!(parse_command("clear"), Some(AppInput::Msg(Msg::ClearClicked)));
        assert_eq!(parse_command("s"), Some(AppInput::Status));
        assert_eq!(parse_command("?"), Some(AppInput::Help));
        assert_eq!(parse_command("exit"), Some(AppInput::Quit));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(
            parse_command("subscribe now"),
            Some(AppInput::Unknown("subscribe now".to_string()))
        );
    }

    #[test]
    fn end_of_input_quits_unless_auto_connecting() {
        assert_eq!(StdinEof::for_session(false).input(), Some(AppInput::Quit));
        assert_eq!(StdinEof::for_session(true), StdinEof::KeepRunning);
        assert_eq!(StdinEof::KeepRunning.input(), None);
    }
}
