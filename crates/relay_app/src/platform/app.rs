use std::io::{self, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use relay_core::{update, AppState, ConnectionStatus, Msg};
use relay_engine::{save_transcript, RelaySession, WsTransport};
use relay_logging::{relay_info, relay_warn};

use super::config::{self, AppConfig, Cli, TokenSource};
use super::effects::EffectRunner;
use super::logging;
use super::ui::commands::{self, AppInput, StdinEof, HELP};
use super::ui::render::{status_report, Renderer, UiLine};

/// Main loop wake-up interval for draining engine events.
const TICK: Duration = Duration::from_millis(50);
/// How long quitting waits for the relay to acknowledge the disconnect.
const DISCONNECT_WAIT: Duration = Duration::from_secs(1);

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();
    let file = config::load_file(cli.config.as_deref())?;
    let config = config::resolve(cli, file)?;

    logging::initialize(&config.log_destination, config.log_level);
    config.relay.validate().context("relay settings")?;

    let session = RelaySession::new(
        config.relay.clone(),
        config.token_provider()?,
        Arc::new(WsTransport),
    );
    let (input_tx, input_rx) = mpsc::channel();
    let interrupt_tx = input_tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(AppInput::Quit);
    })
    .context("installing Ctrl-C handler")?;
    commands::spawn_stdin_reader(input_tx, StdinEof::for_session(config.auto_connect));

    print_banner(&config);
    let mut app = App {
        state: AppState::with_stream_event(config.stream_event.clone()),
        renderer: Renderer::new(),
        runner: EffectRunner::new(session),
    };
    app.present();
    if config.auto_connect {
        app.dispatch(Msg::ConnectClicked);
    }

    app.run_loop(&input_rx, &config.relay.channel);
    let transcript = app.shutdown();

    if let Some(path) = &config.save_path {
        save_transcript(path, &transcript)
            .with_context(|| format!("saving transcript to {}", path.display()))?;
        relay_info!("saved {} bytes to {}", transcript.len(), path.display());
    }
    Ok(())
}

struct App {
    state: AppState,
    renderer: Renderer,
    runner: EffectRunner,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    fn pump(&mut self) {
        for msg in self.runner.drain() {
            self.dispatch(msg);
        }
        if self.state.consume_dirty() {
            self.present();
        }
    }

    fn present(&mut self) {
        emit(self.renderer.render(self.state.view()));
    }

    fn run_loop(&mut self, inputs: &mpsc::Receiver<AppInput>, channel: &str) {
        loop {
            match inputs.recv_timeout(TICK) {
                Ok(AppInput::Quit) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(AppInput::Msg(msg)) => self.dispatch(msg),
                Ok(AppInput::Status) => {
                    for line in status_report(&self.state.view(), channel) {
                        notice(&line);
                    }
                }
                Ok(AppInput::Help) => notice(HELP),
                Ok(AppInput::Unknown(word)) => notice(&format!("unknown command {word:?}; {HELP}")),
                Err(RecvTimeoutError::Timeout) => {}
            }
            self.pump();
        }
    }

    /// Disconnects, stops the engine and hands back the accumulated content.
    fn shutdown(mut self) -> String {
        if self.state.status() != ConnectionStatus::Disconnected {
            self.dispatch(Msg::DisconnectClicked);
            let deadline = Instant::now() + DISCONNECT_WAIT;
            while self.state.status() != ConnectionStatus::Disconnected {
                if Instant::now() >= deadline {
                    relay_warn!("relay did not confirm the disconnect in time");
                    break;
                }
                thread::sleep(Duration::from_millis(20));
                self.pump();
            }
        }
        let App { state, runner, .. } = self;
        drop(runner);
        state.transcript().as_str().to_string()
    }
}

fn print_banner(config: &AppConfig) {
    notice(&format!(
        "relay {} app {} channel {} stream event {}",
        config.relay.server, config.relay.app_id, config.relay.channel, config.stream_event
    ));
    match &config.token_source {
        TokenSource::Http(url) => notice(&format!("session tokens from {url}")),
        TokenSource::Env(var) => notice(&format!("session token from ${var}")),
    }
    notice(HELP);
}

fn emit(lines: Vec<UiLine>) {
    let mut stdout = io::stdout().lock();
    for line in lines {
        match line {
            UiLine::Content(text) => {
                let _ = stdout.write_all(text.as_bytes());
            }
            UiLine::Notice(text) => {
                let _ = stdout.flush();
                notice(&text);
            }
        }
    }
    let _ = stdout.flush();
}

fn notice(text: &str) {
    eprintln!("{} {}", Local::now().format("%H:%M:%S"), text);
}
