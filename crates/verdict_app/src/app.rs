use std::future::Future;
use std::io::{self, BufRead, Write};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use verdict_client::{AnalysisService, ClientSettings, ReqwestAnalysisClient};
use verdict_core::{normalize_insights, update, AnalysisMode, Msg, RequestState};
use verdict_logging::verdict_debug;

use crate::effects::EffectRunner;
use crate::render::{render, render_insights};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

const HELP: &str = "\
Type article text (or a URL in URL mode) and press Enter to analyze it.
  :text     switch to text mode
  :url      switch to URL mode
  :submit   analyze the staged input again
  :more     toggle the full article text
  :clear    clear input and result
  :help     show this help
  :quit     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(AnalysisMode),
    Submit,
    ToggleExpanded,
    Clear,
    Help,
    Quit,
    /// Replace the active field and submit it.
    Input(String),
}

pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(match trimmed {
        ":text" => Command::Mode(AnalysisMode::Text),
        ":url" => Command::Mode(AnalysisMode::Url),
        ":submit" => Command::Submit,
        ":more" => Command::ToggleExpanded,
        ":clear" => Command::Clear,
        ":help" => Command::Help,
        ":quit" | ":q" => Command::Quit,
        _ => Command::Input(line.to_string()),
    })
}

/// One analysis session: the request state plus the local "show full text"
/// toggle, which deliberately lives outside `RequestState`.
pub struct Session {
    state: RequestState,
    runner: EffectRunner,
    expanded: bool,
}

impl Session {
    pub fn new(runner: EffectRunner, expanded: bool) -> Self {
        Self {
            state: RequestState::new(),
            runner,
            expanded,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            queue.extend(self.runner.enqueue(effects));
        }
    }

    /// Applies a user command and returns any text to show.
    pub fn handle(&mut self, command: Command) -> Option<String> {
        match command {
            Command::Mode(mode) => {
                self.expanded = false;
                self.dispatch(Msg::ModeChanged(mode));
            }
            Command::Submit => {
                self.expanded = false;
                self.dispatch(Msg::SubmitClicked);
            }
            Command::Input(value) => {
                self.expanded = false;
                self.dispatch(Msg::InputChanged(value));
                self.dispatch(Msg::SubmitClicked);
            }
            Command::Clear => {
                self.expanded = false;
                self.dispatch(Msg::ClearClicked);
            }
            Command::ToggleExpanded => {
                self.expanded = !self.expanded;
                return Some(render(&self.state.view(), self.expanded));
            }
            Command::Help => return Some(HELP.to_string()),
            Command::Quit => {}
        }
        self.render_if_dirty()
    }

    /// Feeds finished engine work back into the state machine.
    pub fn pump(&mut self, timeout: Duration) -> Option<String> {
        for msg in self.runner.poll(timeout) {
            self.dispatch(msg);
        }
        self.render_if_dirty()
    }

    fn render_if_dirty(&mut self) -> Option<String> {
        if self.state.consume_dirty() {
            Some(render(&self.state.view(), self.expanded))
        } else {
            None
        }
    }
}

/// Submits a single input, waits for the verdict and prints it. Returns
/// whether the analysis succeeded.
pub fn run_once(runner: EffectRunner, mode: AnalysisMode, value: String, expanded: bool) -> anyhow::Result<bool> {
    let mut session = Session::new(runner, expanded);
    session.dispatch(Msg::ModeChanged(mode));
    session.dispatch(Msg::InputChanged(value));
    if session.state().input().submission().is_none() {
        bail!("nothing to analyze: input is empty");
    }
    session.dispatch(Msg::SubmitClicked);

    while session.state().is_loading() {
        session.pump(POLL_INTERVAL);
    }

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", render(&session.state().view(), expanded))?;
    Ok(session.state().result().is_some())
}

/// Reads commands from stdin until `:quit` or end of input.
pub fn run_interactive(runner: EffectRunner, expanded: bool) -> anyhow::Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    thread::Builder::new()
        .name("verdict-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if let Some(command) = parse_command(&line) {
                    if cmd_tx.send(command).is_err() {
                        return;
                    }
                }
            }
        })
        .context("spawning stdin reader")?;

    let mut session = Session::new(runner, expanded);
    let mut stdout = io::stdout();
    writeln!(stdout, "{HELP}")?;
    drive(&mut session, &cmd_rx, &mut stdout)?;
    session.runner.shutdown();
    Ok(())
}

/// Applies commands as they arrive and prints every state change. `:quit`
/// leaves at once; end of input first waits for the request in flight.
fn drive(session: &mut Session, commands: &Receiver<Command>, out: &mut impl Write) -> io::Result<()> {
    loop {
        match commands.recv_timeout(POLL_INTERVAL) {
            Ok(Command::Quit) => return Ok(()),
            Ok(command) => {
                verdict_debug!("command {:?}", command);
                if let Some(output) = session.handle(command) {
                    writeln!(out, "{output}")?;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if let Some(output) = session.pump(Duration::ZERO) {
            writeln!(out, "{output}")?;
        }
        out.flush()?;
    }

    while session.state().is_loading() {
        if let Some(output) = session.pump(POLL_INTERVAL) {
            writeln!(out, "{output}")?;
        }
    }
    out.flush()
}

pub fn run_check(settings: ClientSettings) -> anyhow::Result<()> {
    let client = ReqwestAnalysisClient::new(settings)?;
    let message = block_on(client.health())?.context("service health check failed")?;
    println!("{} is up: {message}", client.base_url());
    Ok(())
}

pub fn run_insights(settings: ClientSettings, text: &str) -> anyhow::Result<()> {
    let text = text.trim();
    if text.is_empty() {
        bail!("nothing to analyze: input is empty");
    }
    let client = ReqwestAnalysisClient::new(settings)?;
    let raw = block_on(client.analyze_text(text))??;
    let insights = normalize_insights(&raw)?;
    print!("{}", render_insights(&insights));
    Ok(())
}

fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    Ok(runtime.block_on(future))
}
